//! One-line notifications, the terminal version of a toast.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }

    pub fn show(&self) {
        match self.level {
            NoticeLevel::Error => eprintln!("{self}"),
            NoticeLevel::Info | NoticeLevel::Success => println!("{self}"),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = match self.level {
            NoticeLevel::Info => "Info",
            NoticeLevel::Success => "Success",
            NoticeLevel::Error => "Error",
        };
        write!(f, "{title}: {}", self.message)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({detail})")?;
        }
        Ok(())
    }
}

pub fn info(message: impl Into<String>) {
    Notice::new(NoticeLevel::Info, message).show();
}

pub fn success(message: impl Into<String>) {
    Notice::new(NoticeLevel::Success, message).show();
}
