use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_nitrolz").to_string()
}

#[test]
fn cli_compress_decompress_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let packed = dir.path().join("input.lz");
    let output = dir.path().join("output.bin");

    std::fs::write(&input, b"abcde12345abcde12345abcde12345").unwrap();

    let st = Command::new(bin())
        .arg("--force")
        .args(["compress", "--format", "lz10"])
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());

    let st = Command::new(bin())
        .arg("--force")
        .arg("decompress")
        .arg(&packed)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(
        std::fs::read(&output).unwrap(),
        std::fs::read(&input).unwrap()
    );
}

#[test]
fn cli_refuses_to_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let out = dir.path().join("out.lz");
    std::fs::write(&input, b"payload").unwrap();
    std::fs::write(&out, b"existing").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&out)
        .status()
        .unwrap();
    assert!(!st.success());
    assert_eq!(std::fs::read(&out).unwrap(), b"existing");
}

#[test]
fn cli_verify_exit_codes() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let good = dir.path().join("good.lz");
    let bad = dir.path().join("bad.lz");
    std::fs::write(&input, b"verify me verify me verify me").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&good)
        .status()
        .unwrap();
    assert!(st.success());

    // Valid file: exit 0.
    let st = Command::new(bin()).arg("verify").arg(&good).status().unwrap();
    assert_eq!(st.code(), Some(0));

    // Wrong tag byte: exit 1.
    let mut data = std::fs::read(&good).unwrap();
    data[0] = 0x42;
    std::fs::write(&bad, &data).unwrap();
    let st = Command::new(bin()).arg("verify").arg(&bad).status().unwrap();
    assert_eq!(st.code(), Some(1));

    // Unreadable file: exit 2.
    let st = Command::new(bin())
        .arg("verify")
        .arg(dir.path().join("no-such-file.lz"))
        .status()
        .unwrap();
    assert_eq!(st.code(), Some(2));

    // Mixed batch takes the worst code.
    let st = Command::new(bin())
        .arg("verify")
        .arg(&good)
        .arg(&bad)
        .arg(dir.path().join("no-such-file.lz"))
        .status()
        .unwrap();
    assert_eq!(st.code(), Some(2));
}

#[test]
fn cli_dump_prints_token_stream() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let packed = dir.path().join("in.lz");
    std::fs::write(&input, b"abcd".repeat(5)).unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .arg(&packed)
        .status()
        .unwrap();
    assert!(st.success());

    let out = Command::new(bin()).arg("dump").arg(&packed).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("lzss10"), "dump output: {text}");
    assert!(text.contains("decompressed size: 20"), "dump output: {text}");
    assert!(text.contains("CPY"), "dump output: {text}");
}

#[test]
fn cli_stdout_pipe() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    std::fs::write(&input, b"pipe me through stdout").unwrap();

    let out = Command::new(bin())
        .args(["compress", "--stdout"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(out.stdout[0], 0x10);
}

#[test]
fn cli_config_works() {
    let out = Command::new(bin()).arg("config").output().unwrap();
    assert!(out.status.success());
}
