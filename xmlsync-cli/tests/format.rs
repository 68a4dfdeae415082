use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn format_writes_canonical_output_to_stdout() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.xml");
    fs::write(&input, "<table><row><cell v=\"1\"/></row></table>").unwrap();

    let mut cmd = cargo_bin_cmd!("xmlsync");
    cmd.arg("format").arg(input.as_os_str());
    cmd.assert().success().stdout(predicate::eq(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <table>\n  <row>\n    <cell v=\"1\"/>\n  </row>\n</table>\n",
    ));
}

#[test]
fn format_preserves_comments() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.xml");
    fs::write(&input, "<top><!-- keep me --><a/></top>").unwrap();

    let mut cmd = cargo_bin_cmd!("xmlsync");
    cmd.arg("format").arg(input.as_os_str());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<!-- keep me -->"));
}

#[test]
fn format_writes_to_output_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.xml");
    let output = dir.path().join("out.xml");
    fs::write(&input, "<a><b/></a>").unwrap();

    let mut cmd = cargo_bin_cmd!("xmlsync");
    cmd.arg("format")
        .arg(input.as_os_str())
        .arg("-o")
        .arg(output.as_os_str());
    cmd.assert().success();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("<a>\n  <b/>\n</a>\n"));
}

#[test]
fn format_is_idempotent() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.xml");
    fs::write(
        &input,
        "<table><!-- q3 --><row a=\"1\" b=\"2\"><cell>total</cell></row></table>",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("xmlsync");
    cmd.arg("format").arg(input.as_os_str());
    let first = cmd.assert().success().get_output().stdout.clone();

    let formatted = dir.path().join("formatted.xml");
    fs::write(&formatted, &first).unwrap();

    let mut cmd = cargo_bin_cmd!("xmlsync");
    cmd.arg("format").arg(formatted.as_os_str());
    let second = cmd.assert().success().get_output().stdout.clone();

    assert_eq!(first, second);
}

#[test]
fn format_rejects_malformed_documents() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("doc.xml");
    fs::write(&input, "<top><row></top>").unwrap();

    let mut cmd = cargo_bin_cmd!("xmlsync");
    cmd.arg("format").arg(input.as_os_str());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Parse error"));
}
