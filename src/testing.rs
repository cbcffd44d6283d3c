//! 测试辅助：init-files 样例、伪包管理器脚本、tracing 输出捕获

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::config::{FileRole, InitFileSet};

pub(crate) const INIT_APP: &str = "import { Component } from '@angular/core'

@Component({
    selector: 'app-root',
    imports: [],
    template: ``,
})
export class App {}
";

pub(crate) const INIT_APP_CONFIG: &str = "import { ApplicationConfig, provideBrowserGlobalErrorListeners, provideZonelessChangeDetection } from '@angular/core'

export const appConfig: ApplicationConfig = {
    providers: [
        provideBrowserGlobalErrorListeners(),
        provideZonelessChangeDetection()
    ]
}
";

pub(crate) const INIT_MAIN: &str = "import { bootstrapApplication } from '@angular/platform-browser'
import { appConfig } from './app/app.config'
import { App } from './app/app'

bootstrapApplication(App, appConfig)
    .catch((err) => console.error(err))
";

pub(crate) const INIT_TSCONFIG: &str = r#"{
  "extends": "./tsconfig.json",
  "compilerOptions": {
    "outDir": "./out-tsc/app",
    "types": []
  },
  "include": [
    "src/**/*.ts"
  ],
  "exclude": [
    "src/**/*.spec.ts"
  ]
}
"#;

pub(crate) const INIT_PACKAGE: &str = r#"{
  "name": "ia",
  "dependencies": {
    "@angular/core": "^20.1.0",
    "rxjs": "~7.8.0",
    "tslib": "^2.3.0"
  }
}
"#;

/// 在 `root/init-files/` 下写入五个模板文件
pub(crate) fn seed(root: &Path) -> InitFileSet {
    let files = InitFileSet::new(root);
    for (role, text) in [
        (FileRole::App, INIT_APP),
        (FileRole::AppConfig, INIT_APP_CONFIG),
        (FileRole::Main, INIT_MAIN),
        (FileRole::Tsconfig, INIT_TSCONFIG),
        (FileRole::Package, INIT_PACKAGE),
    ] {
        let p = files.init_path(role);
        fs::create_dir_all(p.parent().unwrap()).unwrap();
        fs::write(p, text).unwrap();
    }
    files
}

pub(crate) fn live(files: &InitFileSet, role: FileRole) -> String {
    fs::read_to_string(files.live_path(role)).unwrap()
}

pub(crate) fn assert_pristine(files: &InitFileSet) {
    for role in FileRole::ALL {
        assert_eq!(
            fs::read(files.live_path(role)).unwrap(),
            fs::read(files.init_path(role)).unwrap(),
            "{:?}",
            role
        );
    }
}

/// 伪包管理器：每次调用把参数追加到工作区的 `calls.log`；
/// 第一次调用时把当时的 `src/app/app.ts` 复制为 `first-install.ts`。
/// 工作区存在 `fail-install` 文件时以退出码 1 结束。
#[cfg(unix)]
pub(crate) fn fake_package_manager(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-pm.sh");
    let script = r#"#!/bin/sh
[ -f calls.log ] || cp src/app/app.ts first-install.ts
echo "$*" >> calls.log
[ -f fail-install ] && exit 1
exit 0
"#;
    fs::write(&path, script).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// 伪包管理器记录的调用（每行一次）
pub(crate) fn recorded_calls(root: &Path) -> Vec<String> {
    match fs::read_to_string(root.join("calls.log")) {
        Ok(text) => text.lines().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

/// 收集 tracing 输出的 writer
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// 在临时 subscriber 下运行 `f`，返回其结果与期间的日志
pub(crate) fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, logs.contents())
}
