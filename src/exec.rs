use anyhow::{Context, Result};
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Captured result of a finished external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Trimmed stdout
    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Best single-line description of why the command failed
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        match self.code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }
}

/// Trait for executing the external CLIs this tool drives
pub trait CommandExecutor {
    /// Run a command with captured stdout/stderr
    fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Run a command attached to the terminal; fails if the command exits non-zero
    fn execute_interactive(&self, program: &str, args: &[&str]) -> Result<()>;

    /// Check if a command is on PATH
    fn check_command_exists(&self, command: &str) -> bool;
}

/// Executes commands on the local machine
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalExecutor;

impl CommandExecutor for LocalExecutor {
    fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        debug!(command = %render(program, args), "executing");
        let output = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("Failed to execute command: {}", program))?;
        let output = CommandOutput::from(output);
        debug!(command = %render(program, args), code = ?output.code, "finished");
        Ok(output)
    }

    fn execute_interactive(&self, program: &str, args: &[&str]) -> Result<()> {
        debug!(command = %render(program, args), "executing interactively");
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| format!("Failed to execute interactive command: {}", program))?;

        if !status.success() {
            anyhow::bail!(
                "Command '{}' failed with exit code: {}",
                render(program, args),
                status.code().unwrap_or(1)
            );
        }
        Ok(())
    }

    fn check_command_exists(&self, command: &str) -> bool {
        which::which(command).is_ok()
    }
}

/// Render a command line for logs and error messages
pub fn render(program: &str, args: &[&str]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Scripted executor for unit tests
#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct Rule {
        prefix: Vec<String>,
        responses: VecDeque<CommandOutput>,
    }

    /// Records every call and answers from rules matched on argument prefixes.
    /// The most recently added matching rule wins; unmatched calls succeed with empty output.
    #[derive(Default)]
    pub struct FakeExecutor {
        rules: RefCell<Vec<Rule>>,
        calls: RefCell<Vec<String>>,
        missing: Vec<String>,
    }

    pub fn ok(stdout: &str) -> CommandOutput {
        CommandOutput {
            success: true,
            code: Some(0),
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn fail(stderr: &str) -> CommandOutput {
        CommandOutput {
            success: false,
            code: Some(1),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    impl FakeExecutor {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn without_tool(mut self, tool: &str) -> Self {
            self.missing.push(tool.to_string());
            self
        }

        pub fn respond(&self, prefix: &str, output: CommandOutput) -> &Self {
            self.respond_seq(prefix, vec![output])
        }

        /// Answer successive matching calls in order, repeating the last response
        pub fn respond_seq(&self, prefix: &str, outputs: Vec<CommandOutput>) -> &Self {
            self.rules.borrow_mut().push(Rule {
                prefix: prefix.split_whitespace().map(str::to_string).collect(),
                responses: outputs.into(),
            });
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|c| c.starts_with(prefix))
                .collect()
        }

        fn answer(&self, program: &str, args: &[&str]) -> CommandOutput {
            let line = render(program, args);
            self.calls.borrow_mut().push(line);

            let tokens: Vec<&str> = std::iter::once(program).chain(args.iter().copied()).collect();
            let mut rules = self.rules.borrow_mut();
            let rule = rules.iter_mut().rev().find(|rule| {
                rule.prefix.len() <= tokens.len()
                    && rule.prefix.iter().zip(&tokens).all(|(p, t)| p == t)
            });
            match rule {
                Some(rule) if rule.responses.len() > 1 => {
                    rule.responses.pop_front().unwrap_or_else(|| ok(""))
                }
                Some(rule) => rule.responses.front().cloned().unwrap_or_else(|| ok("")),
                None => ok(""),
            }
        }
    }

    impl CommandExecutor for FakeExecutor {
        fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
            Ok(self.answer(program, args))
        }

        fn execute_interactive(&self, program: &str, args: &[&str]) -> Result<()> {
            let output = self.answer(program, args);
            if !output.success {
                anyhow::bail!(
                    "Command '{}' failed with exit code: {}",
                    render(program, args),
                    output.code.unwrap_or(1)
                );
            }
            Ok(())
        }

        fn check_command_exists(&self, command: &str) -> bool {
            !self.missing.iter().any(|m| m == command)
        }
    }
}
