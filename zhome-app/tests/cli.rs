use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../zhome-io/tests/data/furnished_home.xml")
}

fn zhome() -> Command {
    let mut cmd = Command::cargo_bin("zhome-app").expect("找到可执行文件");
    cmd.env_remove("ZHOME_CONFIG");
    cmd
}

#[test]
fn summary_prints_counts() {
    zhome()
        .arg("summary")
        .arg(fixture())
        .assert()
        .success()
        .stdout(predicate::str::contains("名称：Furnished"))
        .stdout(predicate::str::contains("墙体：3（已连接 3）"))
        .stdout(predicate::str::contains("当前视角：observerCamera（200, 300, 170）"))
        .stdout(predicate::str::contains("unknownPattern"));
}

#[test]
fn summary_json_is_machine_readable() {
    let output = zhome()
        .args(["summary", "--json"])
        .arg(fixture())
        .output()
        .expect("运行 summary");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("解析 JSON 输出");
    assert_eq!(value["walls"], 3);
    assert_eq!(value["furniture"], 8);
    assert_eq!(value["levels"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["camera"]["kind"], "Observer");
    assert!(value["extent"]["center"].is_array());
}

#[test]
fn convert_writes_readable_document() {
    let dir = tempfile::tempdir().expect("创建临时目录");
    let output = dir.path().join("converted.xml");
    zhome()
        .arg("convert")
        .arg(fixture())
        .arg(&output)
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).expect("读取转换结果");
    assert!(written.contains(r#"<wall id="wall0""#));

    // 转换结果中的纹理引用仍相对原文档目录，需要通过配置补充搜索根目录。
    let config = dir.path().join("zhome.toml");
    let data_dir = fixture().parent().map(PathBuf::from).expect("示例目录");
    std::fs::write(
        &config,
        format!("[resources]\ncontent_roots = [{:?}]\n", data_dir.display().to_string()),
    )
    .expect("写入配置");
    zhome()
        .arg("--config")
        .arg(&config)
        .arg("summary")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("诊断：无"));
}

#[test]
fn missing_input_fails() {
    zhome()
        .args(["summary", "/no/such/home.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("读取"));
}
