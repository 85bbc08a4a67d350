/*!
 * Spawner Tests
 * End-to-end fork/exec behavior: pids, stdin piping, exec-failure status
 */

use nix::sys::signal::{kill, Signal};
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::Pid;
use std::fs::File;
use std::io::Write;
use worker_host::metrics::{self, Reading};
use worker_host::{SpawnConfig, Spawner, EXEC_FAILURE_STATUS};

#[test]
fn test_spawn_trivial_command() {
    let spawner = Spawner::new();
    let child = spawner.spawn(&SpawnConfig::new("true")).unwrap();
    assert!(child.pid > 0);

    let status = waitpid(Pid::from_raw(child.pid), None).unwrap();
    assert_eq!(status, WaitStatus::Exited(Pid::from_raw(child.pid), 0));
}

#[test]
fn test_exec_failure_exits_with_reserved_status() {
    let spawner = Spawner::new();
    let child = spawner
        .spawn(&SpawnConfig::new("/nonexistent/worker-host-no-such-binary"))
        .unwrap();

    let status = waitpid(Pid::from_raw(child.pid), None).unwrap();
    assert_eq!(
        status,
        WaitStatus::Exited(Pid::from_raw(child.pid), EXEC_FAILURE_STATUS)
    );
}

#[test]
fn test_stdin_pipe_feeds_child() {
    let spawner = Spawner::new();
    let child = spawner
        .spawn(&SpawnConfig::new("cat").with_stdin_pipe())
        .unwrap();

    let mut stdin = File::from(child.stdin.expect("stdin pipe was requested"));
    stdin.write_all(b"fed through the pipe\n").unwrap();
    drop(stdin); // EOF; cat exits

    let status = waitpid(Pid::from_raw(child.pid), None).unwrap();
    assert_eq!(status, WaitStatus::Exited(Pid::from_raw(child.pid), 0));
}

#[test]
fn test_spawned_worker_is_measurable() {
    let spawner = Spawner::new();
    let child = spawner
        .spawn(&SpawnConfig::new("sleep").with_arg("10"))
        .unwrap();
    assert!(child.pid > 0);

    // Race-tolerant by design: a zero/unavailable reading because the
    // process already exited would be acceptable, but a child we have not
    // signalled yet is still alive here.
    if std::path::Path::new("/proc/self/stat").exists() {
        match metrics::procfs::memory_usage_pss_kb(child.pid) {
            Reading::Value(_) => {}
            Reading::Unavailable => panic!("live child should be measurable"),
        }
    }

    kill(Pid::from_raw(child.pid), Signal::SIGKILL).unwrap();
    waitpid(Pid::from_raw(child.pid), None).unwrap();
}
