use std::io::Read;
use std::path::Path;

use anyhow::{Context, bail};
use noteset_core::entities::NoteSubmission;
use noteset_core::enums::SubmitStatus;
use noteset_schema::InvalidSubmission;
use serde_json::Value;

use crate::boundary::Boundary;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::SubmitArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `noteset submit`.
pub async fn handle(args: &SubmitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let input = read_input(args.file.as_deref())?;

    if args.dry_run {
        let submission = match validate(ctx, &input, args.json) {
            Ok(submission) => submission,
            Err(invalid) => {
                output(&invalid.errors, flags.format)?;
                bail!("{invalid}");
            }
        };
        let plan = ctx.service.plan_submission(&submission).await?;
        return output(&plan, flags.format);
    }

    let boundary = Boundary::new(&ctx.service, &ctx.validator, &ctx.config.server.list_path);
    let reply = if args.json {
        boundary.submit_json(parse_json(&input)?).await
    } else {
        boundary.submit(form_body(&input)).await
    };

    output(&reply, flags.format)?;
    if !reply.is_success() {
        let outcome = reply.submit_status().map_or("failed", SubmitStatus::as_str);
        bail!("submission not applied: {outcome} (HTTP {})", reply.status);
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read submission from {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read submission from stdin")?;
            Ok(input)
        }
    }
}

/// Files usually end in a newline that is not part of the last value.
fn form_body(input: &str) -> &str {
    input.trim_end_matches(['\r', '\n'])
}

fn parse_json(input: &str) -> anyhow::Result<Value> {
    serde_json::from_str(input).context("submission is not valid JSON")
}

fn validate(ctx: &AppContext, input: &str, json: bool) -> Result<NoteSubmission, InvalidSubmission> {
    if json {
        let document = parse_json(input).map_err(|error| {
            let mut invalid = InvalidSubmission::default();
            invalid.errors.insert_raw("", format!("{error:#}"));
            invalid
        })?;
        ctx.validator.validate_value(document)
    } else {
        ctx.validator.validate_body(form_body(input))
    }
}

#[cfg(test)]
mod tests {
    use super::{form_body, parse_json};

    #[test]
    fn trailing_newlines_are_not_part_of_the_form() {
        assert_eq!(form_body("notes[0].id=1&notes[0].content=a\n"), "notes[0].id=1&notes[0].content=a");
        assert_eq!(form_body("notes[0].content=a+b\r\n\n"), "notes[0].content=a+b");
        assert_eq!(form_body(""), "");
    }

    #[test]
    fn invalid_json_is_reported() {
        assert!(parse_json("{\"notes\": [").is_err());
        assert_eq!(parse_json("{\"notes\": []}").unwrap()["notes"], serde_json::json!([]));
    }

    #[test]
    fn input_is_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("form.txt");
        std::fs::write(&path, "notes[0].id=3&notes[0].content=x\n").unwrap();
        let input = super::read_input(Some(&path)).unwrap();
        assert_eq!(form_body(&input), "notes[0].id=3&notes[0].content=x");
    }
}
