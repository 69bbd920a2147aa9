use std::fs;
use std::io::{self, Read};

use anyhow::Context as _;

/// Text a command works on, with the name used in messages.
pub struct Input {
    pub name: String,
    pub text: String,
}

impl Input {
    /// `None` and `"-"` mean stdin.
    pub fn read(file: Option<&str>) -> anyhow::Result<Self> {
        match file {
            None | Some("-") => {
                let mut text = String::new();
                io::stdin().read_to_string(&mut text).context("reading stdin")?;
                Ok(Self {
                    name: "<stdin>".to_string(),
                    text,
                })
            }
            Some(path) => {
                let text = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
                Ok(Self {
                    name: path.to_string(),
                    text,
                })
            }
        }
    }
}
