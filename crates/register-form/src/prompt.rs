//! Line-based terminal input for the form.

use crate::form::RegisterForm;
use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use registration_client::DraftField;
use std::io::IsTerminal;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};

/// Blocking read of one answer that is not echoed. `None` at end of input.
pub type SecretReader = fn() -> std::io::Result<Option<String>>;

/// Reads answers line by line and writes prompts.
pub struct Prompter<R, W> {
    lines: Lines<R>,
    out: W,
    secret_reader: Option<SecretReader>,
}

impl Prompter<BufReader<tokio::io::Stdin>, tokio::io::Stdout> {
    /// Prompter over the process's stdin and stdout.
    ///
    /// Secret fields are read from the terminal with echo off. Piped input
    /// has nothing to echo and is read as plain lines.
    pub fn stdio() -> Self {
        let prompter = Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
        if std::io::stdin().is_terminal() {
            prompter.with_secret_reader(read_masked_line)
        } else {
            prompter
        }
    }
}

/// Restores cooked mode when dropped.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Read a line from the terminal in raw mode without echoing keys.
fn read_masked_line() -> std::io::Result<Option<String>> {
    let _raw = RawModeGuard::enable()?;
    let mut value = String::new();

    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Enter => return Ok(Some(value)),
            KeyCode::Backspace => {
                value.pop();
            }
            KeyCode::Char('c') | KeyCode::Char('d')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return Ok(None)
            }
            KeyCode::Char(c) => value.push(c),
            _ => {}
        }
    }
}

impl<R, W> Prompter<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, out: W) -> Self {
        Self {
            lines: input.lines(),
            out,
            secret_reader: None,
        }
    }

    /// Read secret fields through `reader` instead of the line input.
    pub fn with_secret_reader(mut self, reader: SecretReader) -> Self {
        self.secret_reader = Some(reader);
        self
    }

    /// Write a line of output.
    pub async fn say(&mut self, text: &str) -> Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(())
    }

    /// Ask a question; `None` once input is exhausted.
    pub async fn ask(&mut self, question: &str) -> Result<Option<String>> {
        self.out.write_all(format!("{}: ", question).as_bytes()).await?;
        self.out.flush().await?;
        Ok(self.lines.next_line().await?)
    }

    /// Ask for a value that must not be echoed.
    ///
    /// Falls back to [`Prompter::ask`] when no secret reader is set.
    pub async fn ask_secret(&mut self, question: &str) -> Result<Option<String>> {
        let Some(read) = self.secret_reader else {
            return self.ask(question).await;
        };

        self.out.write_all(format!("{}: ", question).as_bytes()).await?;
        self.out.flush().await?;
        let value = tokio::task::spawn_blocking(read).await??;
        // Enter was swallowed by the raw read.
        self.out.write_all(b"\n").await?;
        self.out.flush().await?;
        Ok(value)
    }

    /// Yes/no question. Anything but `y`/`yes` is a no, as is end of input.
    pub async fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.ask(&format!("{} [y/N]", question)).await?;
        Ok(matches!(
            answer.as_deref().map(|a| a.trim().to_ascii_lowercase()).as_deref(),
            Some("y") | Some("yes")
        ))
    }

    /// Fill every text field of the form, asking again while a required
    /// field is left empty. Secret fields are read without echo.
    pub async fn collect_fields(&mut self, form: &RegisterForm) -> Result<()> {
        for field in DraftField::ALL {
            loop {
                let answer = if field.is_secret() {
                    self.ask_secret(field.label()).await?
                } else {
                    self.ask(field.label()).await?
                };
                let Some(value) = answer else {
                    bail!("Input closed before {} was entered", field.label());
                };

                form.set_field(field, value);
                if !form.missing_fields().contains(&field) {
                    break;
                }
                self.say(&format!("{} is required", field.label())).await?;
            }
        }
        Ok(())
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::RedirectSettings;
    use crate::navigation::ChannelNavigator;
    use registration_client::RegistrationClient;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    fn test_form() -> RegisterForm {
        let client = RegistrationClient::new(
            "http://127.0.0.1:9999/register",
            Some(Duration::from_secs(1)),
        )
        .unwrap();
        let (navigator, _routes) = ChannelNavigator::new();
        RegisterForm::new(client, Arc::new(navigator), RedirectSettings::default())
    }

    #[tokio::test]
    async fn test_collect_fields_reprompts_missing() {
        let input: &[u8] = b"Ada\n\n   \nLovelace\nada\nsecret words\n";
        let mut prompter = Prompter::new(input, Vec::new());
        let form = test_form();

        prompter.collect_fields(&form).await.unwrap();

        let draft = form.draft();
        assert_eq!(draft.first_name, "Ada");
        assert_eq!(draft.last_name, "Lovelace");
        assert_eq!(draft.username, "ada");
        assert_eq!(draft.get(DraftField::PassPhrase), "secret words");

        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert_eq!(output.matches("Last Name is required").count(), 2);
    }

    fn typed_pass_phrase() -> std::io::Result<Option<String>> {
        Ok(Some("masked words".into()))
    }

    #[tokio::test]
    async fn test_collect_fields_reads_pass_phrase_without_echo() {
        // The line input ends before the pass phrase; it must come from
        // the secret reader.
        let input: &[u8] = b"Ada\nLovelace\nada\n";
        let mut prompter =
            Prompter::new(input, Vec::new()).with_secret_reader(typed_pass_phrase);
        let form = test_form();

        prompter.collect_fields(&form).await.unwrap();

        assert_eq!(form.draft().get(DraftField::PassPhrase), "masked words");
        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert!(output.contains("Pass Phrase: \n"));
        assert!(!output.contains("masked words"));
    }

    static BLANK_THEN_TYPED_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn blank_then_typed() -> std::io::Result<Option<String>> {
        match BLANK_THEN_TYPED_CALLS.fetch_add(1, Ordering::SeqCst) {
            0 => Ok(Some("  ".into())),
            _ => Ok(Some("second try".into())),
        }
    }

    #[tokio::test]
    async fn test_blank_secret_reprompts() {
        let input: &[u8] = b"Ada\nLovelace\nada\n";
        let mut prompter = Prompter::new(input, Vec::new()).with_secret_reader(blank_then_typed);
        let form = test_form();

        prompter.collect_fields(&form).await.unwrap();

        assert_eq!(form.draft().get(DraftField::PassPhrase), "second try");
        assert_eq!(BLANK_THEN_TYPED_CALLS.load(Ordering::SeqCst), 2);
        let output = String::from_utf8(prompter.into_output()).unwrap();
        assert_eq!(output.matches("Pass Phrase is required").count(), 1);
    }

    fn closed_terminal() -> std::io::Result<Option<String>> {
        Ok(None)
    }

    #[tokio::test]
    async fn test_secret_input_closed_fails() {
        let input: &[u8] = b"Ada\nLovelace\nada\n";
        let mut prompter = Prompter::new(input, Vec::new()).with_secret_reader(closed_terminal);

        tokio_test::assert_err!(prompter.collect_fields(&test_form()).await);
    }

    #[tokio::test]
    async fn test_collect_fields_fails_on_eof() {
        let input: &[u8] = b"Ada\n";
        let mut prompter = Prompter::new(input, Vec::new());

        tokio_test::assert_err!(prompter.collect_fields(&test_form()).await);
    }

    #[tokio::test]
    async fn test_confirm() {
        let input: &[u8] = b"y\nYES\nno\n\n";
        let mut prompter = Prompter::new(input, Vec::new());

        assert!(prompter.confirm("Open camera?").await.unwrap());
        assert!(prompter.confirm("Open camera?").await.unwrap());
        assert!(!prompter.confirm("Open camera?").await.unwrap());
        assert!(!prompter.confirm("Open camera?").await.unwrap());
        // end of input
        assert!(!prompter.confirm("Open camera?").await.unwrap());
    }
}
