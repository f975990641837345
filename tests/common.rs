use assert_cmd::cargo_bin_cmd;
use assert_cmd::Command;

/// A command for the `vedalang` binary, ignoring the user's settings file
pub fn vedalang_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("vedalang");
    cmd.env("VEDALANG_USE_DEFAULT_SETTINGS", "1")
        .env("VEDALANG_LOG_LEVEL", "off");
    cmd
}

#[allow(dead_code)]
pub fn assert_vedalang_runs(args: &[&str]) {
    vedalang_cmd().args(args).assert().success();
}

#[allow(dead_code)]
pub fn assert_vedalang_fails(args: &[&str]) {
    vedalang_cmd().args(args).assert().failure();
}

#[allow(dead_code)]
pub fn get_vedalang_stdout(args: &[&str]) -> String {
    let output = vedalang_cmd().args(args).output().unwrap();
    assert!(output.status.success(), "vedalang {} failed", args.join(" "));
    String::from_utf8(output.stdout).unwrap()
}

/// Define a test which compiles a demo model and checks the output
#[allow(unused_macros)]
macro_rules! define_demo_test {
    ($demo:ident) => {
        #[test]
        fn $demo() {
            check_demo(stringify!($demo));
        }
    };
}
#[allow(unused_imports)]
pub(crate) use define_demo_test;
