use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SSH_PORT: u16 = 22;

/// A `[user@][host:]path` destination, as understood by rsync and ssh.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshTarget {
    pub user: String,
    pub host: String,
    pub path: String,
}

impl SshTarget {
    pub fn parse(destination: &str) -> Self {
        let Some((login, path)) = destination.split_once(':') else {
            return Self {
                path: destination.to_string(),
                ..Self::default()
            };
        };
        let (user, host) = login.split_once('@').unwrap_or(("", login));
        Self {
            user: user.to_string(),
            host: host.to_string(),
            path: path.to_string(),
        }
    }

    /// `user@host`, `host`, or empty for a local destination.
    pub fn login(&self) -> String {
        match (self.user.is_empty(), self.host.is_empty()) {
            (false, _) => format!("{}@{}", self.user, self.host),
            (true, false) => self.host.clone(),
            (true, true) => String::new(),
        }
    }

    /// Path inside the destination, in rsync `login:path` form.
    pub fn rsync_location(&self, path: &str) -> String {
        let login = self.login();
        if login.is_empty() {
            path.to_string()
        } else {
            format!("{login}:{path}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshCommand {
    pub target: SshTarget,
    pub port: u16,
    pub identity_file: Option<PathBuf>,
}

impl SshCommand {
    pub fn new(target: SshTarget, port: u16, identity_file: Option<PathBuf>) -> Self {
        Self {
            target,
            port,
            identity_file,
        }
    }

    /// `ssh [login] [-p PORT] [-i FILE] <remote...>`
    pub fn build<I, S>(&self, remote: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut command = vec!["ssh".to_string()];
        let login = self.target.login();
        if !login.is_empty() {
            command.push(login);
        }
        command.extend(self.connection_args());
        command.extend(
            remote
                .into_iter()
                .map(Into::<String>::into)
                .filter(|arg| !arg.is_empty()),
        );
        command
    }

    /// Remote shell for `rsync -e`.
    pub fn transport(&self) -> String {
        std::iter::once("ssh".to_string())
            .chain(self.connection_args())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn connection_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.port != DEFAULT_SSH_PORT {
            args.push("-p".to_string());
            args.push(self.port.to_string());
        }
        if let Some(identity) = &self.identity_file {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }
        args
    }
}
