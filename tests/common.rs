use assert_cmd::{cargo::cargo_bin_cmd, Command};
use std::fs;
use std::path::Path;

pub fn recall() -> Command {
    cargo_bin_cmd!("recall")
}

#[allow(dead_code)]
pub fn init_store(root: &Path) {
    recall().arg("--root").arg(root).arg("init").assert().success();
}

#[allow(dead_code)]
pub fn write_note(root: &Path, file_name: &str, body: &str) {
    let path = root.join("notes").join(file_name);
    fs::create_dir_all(path.parent().expect("notes dir")).expect("create notes dir");
    fs::write(path, body).expect("write note");
}
