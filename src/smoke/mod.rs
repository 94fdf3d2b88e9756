//! Browser smoke test for the emulator's memory editor.
//!
//! Walks the help page into the Intel sample program, writes a value the
//! editor must reject, and checks that the page answers with an alert.

mod browser;
mod input;
mod webdriver;

pub use browser::{AlertOutcome, Browser, ElementRef, Locator};
pub use input::generate_invalid_input;
pub use webdriver::{WebDriver, WebDriverError};

use std::fmt;

use thiserror::Error;
use tracing::{debug, warn};

pub const START_PAGE: &str = "http://www.emu86.org/";

const HELP_LINK: &str = "Help";
const PROGRAM_LINK: &str = "Intel Program";
const MEMORY_INPUT_CLASS: &str = "memText";
const VALUE_INPUT_ID: &str = "valueText";
const SET_MEMORY_ID: &str = "setMem";

const MEMORY_LITERAL: &str = "104";
/// Not a number, so the editor must refuse it.
const VALUE_LITERAL: &str = "BC";

/// Where the rejected value typed into the value field comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InvalidSource {
    /// Always `BC`.
    #[default]
    Literal,
    /// A fresh draw from [`generate_invalid_input`].
    Random,
}

#[derive(Clone, Debug)]
pub struct Scenario {
    start_page: String,
    invalid_source: InvalidSource,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    OpenStartPage,
    FollowHelp,
    FollowProgram,
    FindMemoryInput,
    TypeMemory,
    FindValueInput,
    TypeValue,
    FindSetMemory,
    ClickSetMemory,
    DismissAlert,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenStartPage => write!(f, "open the start page"),
            Self::FollowHelp => write!(f, "follow the `{}` link", HELP_LINK),
            Self::FollowProgram => write!(f, "follow the `{}` link", PROGRAM_LINK),
            Self::FindMemoryInput => write!(f, "find the memory input (class `{}`)", MEMORY_INPUT_CLASS),
            Self::TypeMemory => write!(f, "type into the memory input"),
            Self::FindValueInput => write!(f, "find the value input (id `{}`)", VALUE_INPUT_ID),
            Self::TypeValue => write!(f, "type into the value input"),
            Self::FindSetMemory => write!(f, "find the set-memory button (id `{}`)", SET_MEMORY_ID),
            Self::ClickSetMemory => write!(f, "click the set-memory button"),
            Self::DismissAlert => write!(f, "dismiss the alert"),
        }
    }
}

#[derive(Debug, Error)]
#[error("could not {step}: {source}")]
pub struct StepFailure {
    pub step: Step,
    pub source: WebDriverError,
}

trait During<T> {
    fn during(self, step: Step) -> Result<T, StepFailure>;
}

impl<T> During<T> for Result<T, WebDriverError> {
    fn during(self, step: Step) -> Result<T, StepFailure> {
        self.map_err(|source| StepFailure { step, source })
    }
}

/// What one run saw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Observation {
    /// Whether the last value typed was one the page should accept.
    pub input_valid: bool,
    pub alert: AlertOutcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    InvalidWithoutAlert,
    ValidWithAlert,
    AsExpected,
}

impl Verdict {
    pub fn judge(observation: &Observation) -> Self {
        match (observation.input_valid, observation.alert.was_shown()) {
            (false, false) => Self::InvalidWithoutAlert,
            (true, true) => Self::ValidWithAlert,
            _ => Self::AsExpected,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidWithoutAlert => "Error: Invalid input is given and alert doesn't pop up",
            Self::ValidWithAlert => "Error: Valid input is given and alert pops up",
            Self::AsExpected => "Ran as expected",
        }
    }

    pub fn is_error(self) -> bool {
        !matches!(self, Self::AsExpected)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    pub observation: Observation,
    pub verdict: Verdict,
    /// Text typed into the value input.
    pub value_typed: String,
    /// Whether the browser session ended cleanly.
    pub closed: bool,
}

impl Scenario {
    pub fn new(start_page: impl Into<String>) -> Self {
        Scenario {
            start_page: start_page.into(),
            invalid_source: InvalidSource::default(),
        }
    }

    pub fn with_invalid_source(mut self, invalid_source: InvalidSource) -> Self {
        self.invalid_source = invalid_source;
        self
    }

    fn value_text(&self) -> String {
        match self.invalid_source {
            InvalidSource::Literal => VALUE_LITERAL.to_string(),
            InvalidSource::Random => generate_invalid_input(&mut rand::thread_rng()),
        }
    }

    /// Run every step, then close the session whatever happened.
    pub async fn run<B: Browser + ?Sized>(&self, browser: &mut B) -> Result<Report, StepFailure> {
        let value_typed = self.value_text();
        let outcome = self.drive(browser, &value_typed).await;
        let closed = match browser.quit().await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "browser session did not close cleanly");
                false
            }
        };
        let observation = outcome?;
        Ok(Report {
            observation,
            verdict: Verdict::judge(&observation),
            value_typed,
            closed,
        })
    }

    async fn drive<B: Browser + ?Sized>(
        &self,
        browser: &mut B,
        value_text: &str,
    ) -> Result<Observation, StepFailure> {
        debug!(url = %self.start_page, "opening start page");
        browser
            .goto(&self.start_page)
            .await
            .during(Step::OpenStartPage)?;

        let help = browser
            .find(Locator::LinkText(HELP_LINK))
            .await
            .during(Step::FollowHelp)?;
        browser.click(&help).await.during(Step::FollowHelp)?;
        let program = browser
            .find(Locator::LinkText(PROGRAM_LINK))
            .await
            .during(Step::FollowProgram)?;
        browser.click(&program).await.during(Step::FollowProgram)?;

        let memory = browser
            .find(Locator::ClassName(MEMORY_INPUT_CLASS))
            .await
            .during(Step::FindMemoryInput)?;
        browser
            .send_keys(&memory, MEMORY_LITERAL)
            .await
            .during(Step::TypeMemory)?;

        let value = browser
            .find(Locator::Id(VALUE_INPUT_ID))
            .await
            .during(Step::FindValueInput)?;
        debug!(value = value_text, "typing rejected value");
        browser
            .send_keys(&value, value_text)
            .await
            .during(Step::TypeValue)?;
        // From here on the form holds a value the page must reject
        let input_valid = false;

        let set_memory = browser
            .find(Locator::Id(SET_MEMORY_ID))
            .await
            .during(Step::FindSetMemory)?;
        browser
            .click(&set_memory)
            .await
            .during(Step::ClickSetMemory)?;

        let alert = browser.accept_alert().await.during(Step::DismissAlert)?;
        debug!(?alert, input_valid, "set memory finished");

        Ok(Observation { input_valid, alert })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;

    /// Scripted page which records everything done to it.
    #[derive(Default)]
    struct FakePage {
        alert_on_set: bool,
        missing: Option<&'static str>,
        alert_error: bool,
        quit_error: bool,
        typed: Vec<(String, String)>,
        clicked: Vec<String>,
        visited: Vec<String>,
        quits: u32,
    }

    fn selector_of(locator: Locator<'_>) -> String {
        let (_, value) = locator.strategy();
        value
    }

    #[async_trait]
    impl Browser for FakePage {
        async fn goto(&mut self, url: &str) -> Result<(), WebDriverError> {
            self.visited.push(url.to_string());
            Ok(())
        }

        async fn find(&mut self, locator: Locator<'_>) -> Result<ElementRef, WebDriverError> {
            let selector = selector_of(locator);
            if self.missing == Some(selector.as_str()) {
                return Err(WebDriverError::Command {
                    error: "no such element".into(),
                    message: format!("Unable to locate {selector}"),
                });
            }
            Ok(ElementRef(selector))
        }

        async fn click(&mut self, element: &ElementRef) -> Result<(), WebDriverError> {
            self.clicked.push(element.0.clone());
            Ok(())
        }

        async fn send_keys(
            &mut self,
            element: &ElementRef,
            text: &str,
        ) -> Result<(), WebDriverError> {
            self.typed.push((element.0.clone(), text.to_string()));
            Ok(())
        }

        async fn accept_alert(&mut self) -> Result<AlertOutcome, WebDriverError> {
            if self.alert_error {
                return Err(WebDriverError::Malformed("connection reset".into()));
            }
            let shown = self.alert_on_set && self.clicked.iter().any(|c| c == "#setMem");
            Ok(if shown {
                AlertOutcome::Shown
            } else {
                AlertOutcome::NoAlert
            })
        }

        async fn quit(&mut self) -> Result<(), WebDriverError> {
            self.quits += 1;
            if self.quit_error {
                return Err(WebDriverError::Command {
                    error: "invalid session id".into(),
                    message: "session deleted because of page crash".into(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn literal_inputs_with_alert() {
        let mut page = FakePage {
            alert_on_set: true,
            ..Default::default()
        };
        let report = Scenario::new(START_PAGE).run(&mut page).await.unwrap();

        assert!(!report.observation.input_valid);
        assert_eq!(report.observation.alert, AlertOutcome::Shown);
        assert_eq!(report.verdict, Verdict::AsExpected);
        assert_eq!(report.value_typed, "BC");
        assert!(report.closed);

        assert_eq!(page.visited, [START_PAGE]);
        assert_eq!(page.clicked, ["Help", "Intel Program", "#setMem"]);
        assert_eq!(
            page.typed,
            [
                (".memText".to_string(), "104".to_string()),
                ("#valueText".to_string(), "BC".to_string()),
            ]
        );
        assert_eq!(page.quits, 1);
    }

    #[tokio::test]
    async fn literal_inputs_without_alert() {
        let mut page = FakePage::default();
        let report = Scenario::new(START_PAGE).run(&mut page).await.unwrap();

        assert!(!report.observation.input_valid);
        assert_eq!(report.observation.alert, AlertOutcome::NoAlert);
        assert_eq!(report.verdict, Verdict::InvalidWithoutAlert);
        assert!(report.verdict.is_error());
        assert_eq!(page.quits, 1);
    }

    #[tokio::test]
    async fn failed_close_keeps_observation() {
        let mut page = FakePage {
            alert_on_set: true,
            quit_error: true,
            ..Default::default()
        };
        let report = Scenario::new(START_PAGE).run(&mut page).await.unwrap();

        assert!(!report.closed);
        assert_eq!(report.observation.alert, AlertOutcome::Shown);
        assert_eq!(report.verdict, Verdict::AsExpected);
        assert_eq!(page.quits, 1);
    }

    #[tokio::test]
    async fn closes_session_when_element_missing() {
        let mut page = FakePage {
            missing: Some("#valueText"),
            ..Default::default()
        };
        let failure = Scenario::new(START_PAGE).run(&mut page).await.unwrap_err();

        assert_eq!(failure.step, Step::FindValueInput);
        assert_eq!(failure.source.code(), Some("no such element"));
        assert!(page.clicked.iter().all(|c| c != "#setMem"));
        assert_eq!(page.quits, 1);
    }

    #[tokio::test]
    async fn closes_session_when_alert_check_fails() {
        let mut page = FakePage {
            alert_error: true,
            ..Default::default()
        };
        let failure = Scenario::new(START_PAGE).run(&mut page).await.unwrap_err();

        assert_eq!(failure.step, Step::DismissAlert);
        assert_eq!(page.quits, 1);
    }

    #[tokio::test]
    async fn random_invalid_value() {
        let mut page = FakePage {
            alert_on_set: true,
            ..Default::default()
        };
        let report = Scenario::new("http://localhost:8000/")
            .with_invalid_source(InvalidSource::Random)
            .run(&mut page)
            .await
            .unwrap();

        assert!(report.value_typed.len() <= 1);
        assert!(!report.value_typed.chars().any(|c| c.is_ascii_digit()));
        assert_eq!(page.typed[1], ("#valueText".to_string(), report.value_typed.clone()));
        assert_eq!(page.visited, ["http://localhost:8000/"]);
    }

    #[test]
    fn verdicts() {
        let judge = |input_valid, alert| Verdict::judge(&Observation { input_valid, alert });
        assert_eq!(judge(false, AlertOutcome::NoAlert), Verdict::InvalidWithoutAlert);
        assert_eq!(judge(true, AlertOutcome::Shown), Verdict::ValidWithAlert);
        assert_eq!(judge(false, AlertOutcome::Shown), Verdict::AsExpected);
        assert_eq!(judge(true, AlertOutcome::NoAlert), Verdict::AsExpected);
        assert_eq!(Verdict::AsExpected.message(), "Ran as expected");
        assert!(!Verdict::AsExpected.is_error());
        assert!(Verdict::ValidWithAlert.is_error());
    }

    #[test]
    fn step_failure_message() {
        let failure = StepFailure {
            step: Step::FollowHelp,
            source: WebDriverError::Malformed("empty body".into()),
        };
        assert_eq!(
            failure.to_string(),
            "could not follow the `Help` link: malformed response: empty body"
        );
    }
}
