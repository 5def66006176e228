//! 생성된 리포트를 시스템 기본 프로그램으로 열기.
//!
//! 실패해도 실행 결과에는 영향을 주지 않으며 로그만 남깁니다.

use std::io;
use std::path::Path;
use std::process::Command;

/// 파일 열기 동작.
pub trait ReportOpener {
    fn open(&self, path: &Path) -> io::Result<()>;
}

/// 플랫폼 기본 열기 명령 (`cmd /C start`, `open`, `xdg-open`).
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl SystemOpener {
    fn command(path: &Path) -> Command {
        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", "start", ""]).arg(path);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.arg(path);
            cmd
        } else {
            let mut cmd = Command::new("xdg-open");
            cmd.arg(path);
            cmd
        }
    }
}

impl ReportOpener for SystemOpener {
    fn open(&self, path: &Path) -> io::Result<()> {
        // 열기 프로그램의 종료를 기다리지 않음
        Self::command(path).spawn().map(|_| ())
    }
}

/// 리포트를 열고 결과를 로그로 남김.
pub fn open_report(opener: &dyn ReportOpener, path: &Path) -> bool {
    match opener.open(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "리포트 파일 열기");
            true
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "리포트 파일 열기 실패");
            false
        }
    }
}
