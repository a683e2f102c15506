use crate::cli::TutorialCommands;
use crate::session::Session;
use anyhow::Result;
use dge_common::tutorial::{TutorialProgress, TUTORIAL_STEPS};

pub fn run(session: &Session, action: Option<TutorialCommands>) -> Result<()> {
    let address = session.address()?;
    let style = &session.style;
    let mut progress = session.store.load_tutorial(&address)?;

    match action.unwrap_or(TutorialCommands::Next) {
        TutorialCommands::Next => {
            print_current(session, &progress);
            return Ok(());
        }
        TutorialCommands::Complete => match progress.current.clone() {
            Some(id) => {
                progress.complete(&id);
                style.print_ok(&format!("Tutorial step '{}' done", id));
            }
            None => style.print_note("No tutorial step to complete"),
        },
        TutorialCommands::Skip => {
            progress.skip();
            style.print_ok("Tutorial disabled. Re-enable with 'dgectl tutorial enable'.");
        }
        TutorialCommands::Enable => {
            progress.enable();
            style.print_ok("Tutorial restarted");
        }
    }

    session.store.save_tutorial(&address, &progress)?;
    print_current(session, &progress);
    Ok(())
}

fn print_current(session: &Session, progress: &TutorialProgress) {
    let style = &session.style;
    if !progress.enabled {
        style.print_note("Tutorial is disabled");
        return;
    }
    match progress.current_step() {
        Some(step) => {
            println!();
            style.print_section(
                &format!("tutorial {}/{}", step.order, TUTORIAL_STEPS.len()),
                step.title,
            );
            println!("  {}", step.content);
            println!();
            println!("  {}", style.dim("'dgectl tutorial complete' to continue"));
        }
        None => style.print_ok("Tutorial finished"),
    }
}
