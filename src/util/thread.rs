/*!
 * Thread Naming
 * Per-thread name cache, kernel-visible on Linux via prctl
 */

use std::cell::RefCell;

thread_local! {
    static THREAD_NAME: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// Names the current thread.
///
/// The name is cached thread-locally and, on Linux, pushed to the kernel so
/// it shows up in the task listing. The kernel truncates names to 15 bytes;
/// the cached copy keeps the full string.
pub fn set_thread_name(name: &str) {
    THREAD_NAME.with(|cell| *cell.borrow_mut() = Some(name.to_string()));

    #[cfg(target_os = "linux")]
    {
        if let Ok(cname) = std::ffi::CString::new(name) {
            if let Err(e) = nix::sys::prctl::set_name(&cname) {
                log::warn!("Cannot set thread name to [{}]: {}", name, e);
            }
        }
    }
}

/// Returns the current thread's name.
///
/// Falls back to the kernel-reported name on Linux for threads that were
/// never named through [`set_thread_name`], and to `<noid>` when nothing is
/// known.
pub fn current_thread_name() -> String {
    if let Some(name) = THREAD_NAME.with(|cell| cell.borrow().clone()) {
        return name;
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(cname) = nix::sys::prctl::get_name() {
            let name = cname.to_string_lossy().into_owned();
            THREAD_NAME.with(|cell| *cell.borrow_mut() = Some(name.clone()));
            return name;
        }
    }

    "<noid>".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_thread_name() {
        std::thread::spawn(|| {
            set_thread_name("metrics-poll");
            assert_eq!(current_thread_name(), "metrics-poll");
        })
        .join()
        .unwrap();
    }

    #[test]
    fn test_names_are_thread_local() {
        set_thread_name("outer");
        std::thread::spawn(|| {
            set_thread_name("inner");
            assert_eq!(current_thread_name(), "inner");
        })
        .join()
        .unwrap();
        assert_eq!(current_thread_name(), "outer");
    }
}
