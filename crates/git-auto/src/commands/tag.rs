//! Tag command: create the next version tag and optionally push it.

use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use git_auto_core::git::{DEFAULT_REMOTE, Gateway};
use git_auto_core::tag::{TagOutcome, TagRequest, version_up};
use git_auto_core::version::Target;

/// Arguments for the `tag` subcommand.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// `major`, `minor`, `patch`, or an explicit tag name used as-is
    #[arg(value_name = "VERSION_OR_KEYWORD")]
    pub target: Target,

    /// Push the new tag to origin
    #[arg(short, long)]
    pub push: bool,

    /// Annotation message (creates an annotated tag when non-empty)
    #[arg(short, long, default_value = "")]
    pub message: String,
}

impl TagArgs {
    fn request(&self) -> TagRequest {
        TagRequest::new(self.target.clone())
            .with_message(self.message.as_str())
            .with_push(self.push)
    }
}

/// Create a tag and report it.
#[instrument(name = "cmd_tag", skip_all, fields(target = %args.target, push = args.push))]
pub fn cmd_tag<G: Gateway + ?Sized>(
    args: &TagArgs,
    global_json: bool,
    git: &G,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing tag command");

    let outcome = version_up(git, &args.request())?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

fn print_outcome(outcome: &TagOutcome) {
    let kind = if outcome.annotated { "annotated tag" } else { "tag" };
    match &outcome.previous {
        Some(previous) => println!(
            "{} Created {kind} {} {}",
            "✓".green(),
            outcome.version.green().bold(),
            format!("(from {previous})").dimmed()
        ),
        None => println!("{} Created {kind} {}", "✓".green(), outcome.version.green().bold()),
    }
    if outcome.pushed {
        println!("{} Pushed to {}", "✓".green(), DEFAULT_REMOTE.cyan());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use git_auto_core::git::Invocation;
    use git_auto_core::git::fake::FakeGit;
    use git_auto_core::version::BumpLevel;

    fn args(target: &str, push: bool, message: &str) -> TagArgs {
        TagArgs {
            target: target.parse().unwrap(),
            push,
            message: message.to_string(),
        }
    }

    #[test]
    fn request_carries_flags() {
        let request = args("major", true, "notes").request();
        assert_eq!(request.target, Target::Bump(BumpLevel::Major));
        assert!(request.push);
        assert_eq!(request.message.as_deref(), Some("notes"));
    }

    #[test]
    fn tags_through_gateway() {
        let git = FakeGit::new().with_latest_tag("v1.1.1\n");
        cmd_tag(&args("minor", false, ""), false, &git).unwrap();
        assert!(git.calls().contains(&Invocation::CreateTag {
            name: "v1.2.0".into(),
            message: None,
        }));
    }

    #[test]
    fn json_output_succeeds() {
        let git = FakeGit::new().with_latest_tag("1.0.0\n");
        assert!(cmd_tag(&args("patch", true, "release"), true, &git).is_ok());
    }

    #[test]
    fn malformed_tag_is_an_error() {
        let git = FakeGit::new().with_latest_tag("v1.1.1aaa\n");
        let err = cmd_tag(&args("patch", false, ""), false, &git).unwrap_err();
        assert_eq!(err.to_string(), "does not match version: v1.1.1aaa");
        assert!(!git.created_tag());
    }
}
