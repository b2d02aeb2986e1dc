use demoer::{Decorator, Pacing, Renderer, SourceRenderer, parse_str};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::Command;

const DEMO: &str = r#"#!/usr/bin/env demoer
#!/bin/bash

# Show where we are
pwd

# pause
ls -la /tmp | head -3

for f in a b; do
  echo "item $f"
done

echo done # pause
"#;

fn decorate(script: &str) -> String {
    let mut out = Vec::new();
    Decorator::new(Pacing::default(), "demoer", StdRng::seed_from_u64(11))
        .decorate_script(script, &mut out)
        .expect("Failed to decorate script");
    String::from_utf8(out).unwrap()
}

/// Remove everything the decorator adds, leaving the executed statements.
fn strip_scaffolding(decorated: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut lines = decorated.lines();

    while let Some(line) = lines.next() {
        if let Some(rest) = line.strip_prefix("cat <<'") {
            let eof = rest.split('\'').next().unwrap();
            for body in lines.by_ref() {
                if body == eof {
                    break;
                }
            }
        } else if line.starts_with("sleep ") && line.ends_with("# wait between statements") {
            statements.push(current.join("\n"));
            current.clear();
        } else if line.is_empty()
            || line.starts_with("#!")
            || line.starts_with("# line ")
            || line.ends_with("# pause before printing")
            || line.ends_with("# pause before running")
        {
            continue;
        } else {
            current.push(line);
        }
    }
    statements
}

#[test]
fn test_generated_script_layout() {
    let out = decorate(DEMO);
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], "#!/bin/bash");
    assert_eq!(lines[1], "# line 4");
    assert!(!out.contains("env demoer"));

    assert!(out.contains("\n\n# line 7\nread -r -s -n 1    # pause before printing\ncat <<'"));
    assert!(out.contains("\n> # pause\n> ls -la /tmp | head -3\n"));
    assert!(out.contains("\n\n# line 10\ncat <<'"));
    assert!(out.contains("\n> for f in a b; do\n>   echo \"item $f\"\n> done\n"));
    assert!(out.contains("\n\n# line 14\ncat <<'"));
    assert!(out.contains("\n> echo done # pause\nEOF_"));
    assert!(out.contains(
        "read -r -s -n 1    # pause before running\necho done # pause\nsleep 0.8    # wait between statements\n"
    ));
    assert_eq!(out.matches("# wait between statements").count(), 4);
    assert_eq!(out.matches("# pause before printing").count(), 1);
    assert_eq!(out.matches("# pause before running").count(), 1);
}

#[test]
fn test_preview_matches_executed_statement() {
    let out = decorate(DEMO);
    let mut lines = out.lines();
    while let Some(line) = lines.next() {
        let Some(rest) = line.strip_prefix("cat <<'") else {
            continue;
        };
        let eof = rest.split('\'').next().unwrap();
        let preview: Vec<&str> = lines
            .by_ref()
            .take_while(|body| *body != eof)
            .map(|body| body.strip_prefix("> ").expect("preview line without marker"))
            .collect();
        let executed: Vec<&str> = lines
            .by_ref()
            .skip_while(|l| l.ends_with("# pause before running"))
            .take(preview.len())
            .collect();
        assert_eq!(preview, executed);
    }
}

#[test]
fn test_stripping_scaffolding_gives_rendered_statements() {
    let script = "cd /tmp\n\n# pause\necho one\nx=1; echo $x # pause\nwhile false; do\n  :\ndone\n";
    let expected: Vec<String> = parse_str(script)
        .unwrap()
        .map(|stmt| SourceRenderer.render(&stmt.unwrap()).unwrap())
        .collect();
    assert_eq!(strip_scaffolding(&decorate(script)), expected);
}

#[test]
fn test_cli_writes_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("demo.sh");
    fs::write(&script, "echo hi\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_demoer"))
        .arg("--output")
        .arg("-")
        .arg(&script)
        .output()
        .expect("Failed to execute demoer");

    assert!(
        output.status.success(),
        "demoer failed with stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("# line 1\ncat <<'EOF_"), "got: {stdout}");
    assert!(stdout.contains("| pv -qL 20\n> echo hi\nEOF_"));
    assert!(stdout.ends_with("\necho hi\nsleep 0.8    # wait between statements\n"));
    assert!(!stdout.contains("read -r"));
}

#[test]
fn test_cli_writes_executable_file() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("demo.sh");
    let target = dir.path().join("demo-out.sh");
    fs::write(&script, "#!/bin/sh\nls\n").unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_demoer"))
        .arg("-o")
        .arg(&target)
        .arg(&script)
        .status()
        .expect("Failed to execute demoer");

    assert!(status.success());
    let content = fs::read_to_string(&target).unwrap();
    assert!(content.starts_with("#!/bin/sh\n# line 2\n"));
    let mode = fs::metadata(&target).unwrap().permissions().mode();
    assert_ne!(mode & 0o100, 0, "output should be executable");
}

#[test]
fn test_cli_without_input() {
    let output = Command::new(env!("CARGO_BIN_EXE_demoer"))
        .output()
        .expect("Failed to execute demoer");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no input file given"), "got: {stderr}");
    assert!(stderr.contains("Usage"), "got: {stderr}");
}

#[test]
fn test_cli_invalid_script() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("broken.sh");
    fs::write(&script, "echo ok\necho \"unterminated\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_demoer"))
        .args(["-o", "-"])
        .arg(&script)
        .output()
        .expect("Failed to execute demoer");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("\necho ok\n"));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: syntax error"), "got: {stderr}");
}

#[test]
fn test_cli_full_output_device() {
    let Ok(full) = fs::OpenOptions::new().write(true).open("/dev/full") else {
        return;
    };
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("demo.sh");
    fs::write(&script, "echo hi\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_demoer"))
        .args(["-o", "-"])
        .arg(&script)
        .stdout(full)
        .output()
        .expect("Failed to execute demoer");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: Failed to write stdout"), "got: {stderr}");
}

/// A `pv` that just copies stdin, so demos run without the real tool.
fn stub_pv(dir: &Path) {
    let pv = dir.join("pv");
    fs::write(&pv, "#!/bin/sh\nexec cat\n").unwrap();
    fs::set_permissions(&pv, fs::Permissions::from_mode(0o755)).unwrap();
}

#[test]
fn test_cli_runs_demo_and_propagates_exit_code() {
    if !Path::new("/bin/sh").exists() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    stub_pv(dir.path());
    let script = dir.path().join("demo.sh");
    fs::write(
        &script,
        "#!/usr/bin/env demoer\n#!/bin/sh\necho hello from the demo\nexit 3\n",
    )
    .unwrap();

    let path = format!(
        "{}:{}",
        dir.path().display(),
        std::env::var("PATH").unwrap_or_default()
    );
    let output = Command::new(env!("CARGO_BIN_EXE_demoer"))
        .arg(&script)
        .env("PATH", path)
        .output()
        .expect("Failed to execute demoer");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        output.status.code(),
        Some(3),
        "stdout: {stdout}\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("> echo hello from the demo\n"), "got: {stdout}");
    assert!(stdout.contains("\nhello from the demo\n"), "got: {stdout}");
    assert!(stdout.contains("> exit 3\n"), "got: {stdout}");
}
