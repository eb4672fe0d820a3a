//! Example walking through most of the prompts in one session.
//!
//! Run with: cargo run --example signup
//!
//! Set PROMPTKIT_DEBUG=1 to write a debug log to tmp/promptkit-debug.log.

use promptkit::prelude::*;
use std::{thread, time::Duration};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    match signup() {
        Err(PromptError::Cancelled) => {
            // The prompt already printed "Cancelled."
            std::process::exit(1);
        }
        other => Ok(other?),
    }
}

fn signup() -> PromptResult<()> {
    intro("Create an account")?;

    let name = TextPrompt::new("What is your name?")
        .with_placeholder("E.g. Taylor Otwell")
        .required()
        .validate(|name| (name.chars().count() < 2).then(|| "Name is too short.".to_string()))
        .prompt()?;

    let _password = PasswordPrompt::new("Choose a password")
        .with_hint("At least 8 characters.")
        .validate(|p| (p.chars().count() < 8).then(|| "Password is too short.".to_string()))
        .prompt()?;

    let role = SelectPrompt::new("What role should the user have?")
        .with_options([
            ("member", "Member"),
            ("contributor", "Contributor"),
            ("owner", "Owner"),
        ])
        .with_default("member")
        .prompt()?;

    let permissions = MultiSelectPrompt::new("Which permissions?")
        .with_options([
            ("read", "Read"),
            ("create", "Create"),
            ("update", "Update"),
            ("delete", "Delete"),
        ])
        .with_defaults(["read"])
        .prompt()?;

    let languages = ["Rust", "Go", "PHP", "Python", "TypeScript", "Ruby"];
    let language = SearchPrompt::new("Favourite language", move |query| {
        let query = query.to_lowercase();
        Ok(languages
            .iter()
            .filter(|l| l.to_lowercase().contains(&query))
            .map(|l| (l.to_lowercase(), l.to_string()))
            .collect())
    })
    .with_placeholder("Start typing...")
    .prompt()?;

    if !confirm("Create the account?")? {
        warning("Nothing was created.")?;
        return Ok(());
    }

    let steps = vec!["Reserving username", "Writing profile", "Sending welcome email"];
    Progress::new("Creating account", steps)?
        .with_item_label(|step| step.to_string())
        .run(|_step| {
            thread::sleep(Duration::from_millis(400));
            Ok(())
        })?;

    info(&format!(
        "{name} is a {role} who likes {language}, with {} permission(s).",
        permissions.len()
    ))?;
    outro("All done!")?;
    Ok(())
}
