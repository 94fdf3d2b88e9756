use std::cell::RefCell;
use std::ffi::OsStr;

use tracing_subscriber::EnvFilter;

pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";
pub const DEFAULT_BROWSER: &str = "chrome";

#[derive(Clone, Debug, Default)]
struct Env {
    webdriver_url: Option<String>,
    base_url: Option<String>,
    browser: Option<String>,
}

thread_local! {
    /// Must only be mutated within `set_env`
    static ENV: RefCell<Option<Env>> = const { RefCell::new(None) };
}

pub fn init() {
    let value = Env {
        webdriver_url: var("EMU86_WEBDRIVER_URL"),
        base_url: var("EMU86_BASE_URL"),
        browser: var("EMU86_BROWSER"),
    };
    set_env(value);
}

/// Install the `tracing` subscriber, filtered by `EMU86_LOG` (default `warn`).
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("EMU86_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    // Ignore a subscriber installed by an embedding program
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn webdriver_url() -> String {
    with_env(|env| env.webdriver_url.clone()).unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.into())
}

pub fn base_url() -> String {
    with_env(|env| env.base_url.clone()).unwrap_or_else(|| crate::smoke::START_PAGE.into())
}

pub fn browser() -> String {
    with_env(|env| env.browser.clone()).unwrap_or_else(|| DEFAULT_BROWSER.into())
}

fn set_env(value: Env) {
    ENV.with(|env| {
        let mut env = env.borrow_mut();
        assert!(
            env.is_none(),
            "tried to initialize environment state multiple times"
        );
        *env = Some(value);
    });
}

fn with_env<F, R>(callback: F) -> R
where
    F: Fn(&Env) -> R,
{
    ENV.with(|env| {
        let env = env.borrow();
        let env = env.as_ref().unwrap_or_else(|| {
            panic!("tried to access environment state before initialization");
        });
        callback(env)
    })
}

/// Set and non-empty.
fn var(name: impl AsRef<OsStr>) -> Option<String> {
    std::env::var(name.as_ref()).ok().filter(|v| !v.trim().is_empty())
}
