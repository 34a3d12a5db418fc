use std::io::{self, BufRead, Write};

use anyhow::Result;

use crate::agent::{AgentRequest, TaskRequest, UserId};
use crate::Opero;

const USAGE: &str = "Commands: :task <type> [key=value ...] | :templates | :context | :contacts | :help | exit";

/// Run the chat console on stdin/stdout
pub async fn run(opero: Opero, user_id: UserId) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with(&opero, user_id, stdin.lock(), stdout.lock())
}

/// Console loop over arbitrary input/output
pub fn run_with<R: BufRead, W: Write>(opero: &Opero, user_id: UserId, input: R, mut out: W) -> Result<()> {
    writeln!(out, "Welcome to the Opero assistant")?;
    writeln!(out, "Chatting as user {}. Type ':help' for commands or 'exit' to quit", user_id)?;

    let agent = opero.agent();
    let mut lines = input.lines();

    loop {
        write!(out, "> ")?;
        out.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let line = line.trim();

        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if let Some(command) = line.strip_prefix(':') {
            let parts: Vec<&str> = command.split_whitespace().collect();
            match parts.as_slice() {
                ["task", task_type, rest @ ..] => match super::parse_params(rest) {
                    Ok(params) => {
                        let response = agent.execute_task(&TaskRequest::new(*task_type, params));
                        writeln!(out, "{} [{}]", response.task_id, response.status.as_str())?;
                        writeln!(out, "{}", serde_json::to_string_pretty(&response.result)?)?;
                    }
                    Err(e) => writeln!(out, "Error: {}", e)?,
                },
                ["templates"] => {
                    for template in crate::agent::task_templates() {
                        writeln!(
                            out,
                            "  {:<18} {} ({})",
                            template.task_type,
                            template.description,
                            template.parameters.join(", ")
                        )?;
                    }
                }
                ["context"] => {
                    writeln!(out, "{}", serde_json::to_string_pretty(&agent.user_context(user_id))?)?;
                }
                ["contacts"] => {
                    for contact in opero.contacts().list() {
                        writeln!(
                            out,
                            "  #{} {} {} ({})",
                            contact.id,
                            contact.first_name,
                            contact.last_name.as_deref().unwrap_or(""),
                            contact.company.as_deref().unwrap_or("-")
                        )?;
                    }
                }
                _ => writeln!(out, "{}", USAGE)?,
            }
            continue;
        }

        let response = agent.chat(&AgentRequest::new(user_id, line));
        writeln!(out, "{}", response.response)?;
        for action in &response.actions {
            writeln!(out, "  - {} ({}): {}", action.action_type, action.status, action.description)?;
        }
    }

    writeln!(out, "Goodbye!")?;
    Ok(())
}
