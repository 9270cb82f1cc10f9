use sysinfo::{ProcessesToUpdate, System};

/// Resident memory of the current process in MB, when the platform reports it.
pub fn resident_memory_mb() -> Option<f64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system
        .process(pid)
        .map(|process| process.memory() as f64 / 1024.0 / 1024.0)
}
