//! External encoder invocation
//!
//! The FBX writer itself lives in the host tool; this adapter hands one
//! encode job to a user-configured command. The command gets the output
//! path as its final argument and the remaining job parameters through
//! `FBXBATCH_*` environment variables, and must write exactly one file at
//! the given path.

use std::process::Command;

use anyhow::Context;
use fbxbatch_core::encoder::{EncodeError, EncodeJob, MeshEncoder};
use fbxbatch_core::scene::Scene;
use fbxbatch_core::settings::SmoothingMode;

/// Runs an external encoder command for every encode job
pub struct CommandEncoder {
    program: String,
    args: Vec<String>,
}

impl CommandEncoder {
    /// Parse a whitespace-separated command line into program and arguments
    pub fn from_command_line(command_line: &str) -> anyhow::Result<Self> {
        let mut parts = command_line.split_whitespace();
        let program = parts
            .next()
            .context("encoder command is empty")?
            .to_string();
        Ok(Self {
            program,
            args: parts.map(str::to_string).collect(),
        })
    }
}

impl MeshEncoder for CommandEncoder {
    fn encode(&mut self, scene: &Scene, job: &EncodeJob) -> Result<(), EncodeError> {
        let selection: Vec<&str> = scene
            .selected()
            .iter()
            .filter_map(|&id| scene.object(id))
            .map(|o| o.name.as_str())
            .collect();

        let smoothing = match job.smoothing {
            SmoothingMode::NormalsOnly => "OFF",
            SmoothingMode::Face => "FACE",
        };

        tracing::debug!(
            program = %self.program,
            path = %job.output_path.display(),
            "invoking encoder command"
        );

        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(&job.output_path)
            .env("FBXBATCH_SELECTION", selection.join(";"))
            .env("FBXBATCH_TANGENTS", if job.export_tangents { "1" } else { "0" })
            .env("FBXBATCH_SMOOTHING", smoothing)
            .env("FBXBATCH_AXIS_FORWARD", job.axis_forward.as_str())
            .env("FBXBATCH_AXIS_UP", job.axis_up.as_str())
            .status()
            .map_err(EncodeError::Io)?;

        if !status.success() {
            return Err(EncodeError::Failed(format!(
                "encoder command exited with {status}"
            )));
        }
        if !job.output_path.exists() {
            return Err(EncodeError::Failed(format!(
                "encoder command produced no file at {}",
                job.output_path.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_program_and_args() {
        let encoder =
            CommandEncoder::from_command_line("blender --background --python export.py")
                .expect("parse");
        assert_eq!(encoder.program, "blender");
        assert_eq!(encoder.args, vec!["--background", "--python", "export.py"]);
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(CommandEncoder::from_command_line("   ").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn runs_the_command_and_checks_the_output_file() {
        use fbxbatch_core::prelude::Vec3;
        use tempfile::tempdir;

        let dir = tempdir().expect("tempdir");
        let out = dir.path().join("SM_Probe.fbx");

        let mut scene = Scene::new();
        let id = scene.add_object("Probe", Vec3::ZERO, None);
        scene.select(id);

        let job = EncodeJob::new(&out, true, SmoothingMode::Face);

        let mut touch = CommandEncoder::from_command_line("touch").expect("parse");
        touch.encode(&scene, &job).expect("encode");
        assert!(out.exists());

        // A command that exits cleanly but writes nothing is a failure
        let missing = EncodeJob::new(dir.path().join("missing.fbx"), true, SmoothingMode::Face);
        let mut noop = CommandEncoder::from_command_line("true").expect("parse");
        assert!(matches!(
            noop.encode(&scene, &missing),
            Err(EncodeError::Failed(_))
        ));
    }
}
