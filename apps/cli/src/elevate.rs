//! 权限提升
//!
//! 访问总线硬件需要 root。非 root 运行时通过 `sudo -E` 重新执行自身，
//! 转发原始参数和环境变量；`exec` 成功后当前进程映像被替换，不会返回。

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use tracing::info;

/// 是否以 root 身份运行
#[cfg(unix)]
pub fn is_elevated() -> bool {
    // SAFETY: geteuid 总是成功，没有副作用
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
pub fn is_elevated() -> bool {
    true
}

/// 构建 `sudo -E <exe> <args...>` 命令
pub fn sudo_command(exe: &Path, args: impl IntoIterator<Item = OsString>) -> Command {
    let mut command = Command::new("sudo");
    command.arg("-E").arg(exe).args(args);
    command
}

/// 确保以 root 运行；否则重新执行自身（成功时不返回）
pub fn ensure_elevated() -> Result<()> {
    if is_elevated() {
        return Ok(());
    }

    let exe = std::env::current_exe().context("无法确定当前可执行文件路径")?;
    info!(exe = %exe.display(), "not running as root, re-executing with sudo");

    let command = sudo_command(&exe, std::env::args_os().skip(1));
    reexec(command)
}

#[cfg(unix)]
fn reexec(mut command: Command) -> Result<()> {
    use std::os::unix::process::CommandExt;

    // exec 只在失败时返回
    let err = command.exec();
    Err(err).context("通过 sudo 重新执行失败")
}

#[cfg(not(unix))]
fn reexec(_command: Command) -> Result<()> {
    Ok(())
}
