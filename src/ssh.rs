use crate::cmd;
use crate::error::DeployResult;
use crate::output::Reporter;

/// SSH session wrapper for executing commands and transferring
/// files to the deployment host.
pub struct SshSession {
    destination: String,
}

impl SshSession {
    /// `destination` is the SSH target, either `host` or
    /// `user@host`.
    #[must_use]
    pub fn new(destination: &str) -> Self {
        Self {
            destination: destination.to_string(),
        }
    }

    /// Execute a command on the remote host and capture output.
    pub fn exec(&self, command: &str) -> DeployResult<String> {
        let args = self.build_ssh_args(command);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        cmd::run("ssh", &refs)
    }

    /// Execute a command on the remote host through the
    /// reporter's output policy.
    pub fn exec_through(
        &self,
        reporter: &mut dyn Reporter,
        command: &str,
    ) -> DeployResult<()> {
        let args = self.build_ssh_args(command);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        reporter.run("ssh", &refs)
    }

    /// Copy a local file to a path on the remote host.
    pub fn copy_to(
        &self,
        reporter: &mut dyn Reporter,
        local_path: &str,
        remote_path: &str,
    ) -> DeployResult<()> {
        let mut args = scp_base_args();
        args.push(local_path.to_string());
        args.push(format!("{}:{remote_path}", self.destination));

        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        reporter.run("scp", &refs)
    }

    fn build_ssh_args(&self, command: &str) -> Vec<String> {
        let mut args = ssh_base_args();
        args.push(self.destination.clone());
        args.push(command.to_string());
        args
    }
}

fn ssh_base_args() -> Vec<String> {
    vec![
        "-o".to_string(),
        "StrictHostKeyChecking=accept-new".to_string(),
        "-o".to_string(),
        "ConnectTimeout=10".to_string(),
    ]
}

fn scp_base_args() -> Vec<String> {
    vec![
        "-o".to_string(),
        "StrictHostKeyChecking=accept-new".to_string(),
    ]
}
