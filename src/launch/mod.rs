//! Opening proxy URLs in a new browsing context

use std::io;
use std::process::{Command, Stdio};
use thiserror::Error;
use tracing::debug;

/// Result of asking a navigator to open a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    /// A new browsing context was created
    Opened,
    /// The environment refused to create one (popup blocker and friends)
    Blocked,
}

/// Failures while trying to open
#[derive(Debug, Error)]
pub enum NavigatorError {
    #[error("failed to start browser launcher {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("refusing to open non-http url: {0}")]
    UnsupportedUrl(String),
}

/// Something that can open a URL in a new tab or window
pub trait Navigator {
    fn open(&self, url: &str) -> Result<OpenOutcome, NavigatorError>;
}

/// Opens URLs with the desktop's default browser
#[derive(Debug, Clone, Default)]
pub struct SystemNavigator;

impl SystemNavigator {
    pub fn new() -> Self {
        Self
    }

    fn command(url: &str) -> (&'static str, Command) {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(url);
            ("open", cmd)
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", "", url]);
            ("cmd", cmd)
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(url);
            ("xdg-open", cmd)
        }
    }
}

fn check_web_url(url: &str) -> Result<(), NavigatorError> {
    if url.starts_with("https://") || url.starts_with("http://") {
        Ok(())
    } else {
        Err(NavigatorError::UnsupportedUrl(url.to_string()))
    }
}

impl Navigator for SystemNavigator {
    fn open(&self, url: &str) -> Result<OpenOutcome, NavigatorError> {
        // Only ever hand web URLs to the shell opener
        check_web_url(url)?;

        let (program, mut cmd) = Self::command(url);
        let status = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| NavigatorError::Spawn { program, source })?;

        if status.success() {
            Ok(OpenOutcome::Opened)
        } else {
            debug!("{} exited with {}", program, status);
            Ok(OpenOutcome::Blocked)
        }
    }
}

/// Web navigator: the response itself redirects the browser. With automatic
/// redirects turned off every launch counts as blocked and the caller shows
/// the manual fallback instead.
#[derive(Debug, Clone, Copy)]
pub struct RedirectNavigator {
    auto_redirect: bool,
}

impl RedirectNavigator {
    pub fn new(auto_redirect: bool) -> Self {
        Self { auto_redirect }
    }
}

impl Navigator for RedirectNavigator {
    fn open(&self, url: &str) -> Result<OpenOutcome, NavigatorError> {
        check_web_url(url)?;
        if self.auto_redirect {
            Ok(OpenOutcome::Opened)
        } else {
            Ok(OpenOutcome::Blocked)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::cell::RefCell;

    /// Navigator returning a scripted answer and recording what it was given
    pub struct ScriptedNavigator {
        answer: fn() -> Result<OpenOutcome, NavigatorError>,
        pub opened: RefCell<Vec<String>>,
    }

    impl ScriptedNavigator {
        pub fn opens() -> Self {
            Self::with(|| Ok(OpenOutcome::Opened))
        }

        pub fn blocks() -> Self {
            Self::with(|| Ok(OpenOutcome::Blocked))
        }

        pub fn fails() -> Self {
            Self::with(|| {
                Err(NavigatorError::Spawn {
                    program: "test",
                    source: io::Error::new(io::ErrorKind::NotFound, "missing"),
                })
            })
        }

        fn with(answer: fn() -> Result<OpenOutcome, NavigatorError>) -> Self {
            Self {
                answer,
                opened: RefCell::new(Vec::new()),
            }
        }
    }

    impl Navigator for ScriptedNavigator {
        fn open(&self, url: &str) -> Result<OpenOutcome, NavigatorError> {
            self.opened.borrow_mut().push(url.to_string());
            (self.answer)()
        }
    }
}
