/*!
 * Process Probe - Main Entry Point
 *
 * Exercises the process core end to end:
 * - Identity, environment, and working directory
 * - Events and deferred tasks
 * - Monotonic timing and memory sampling
 * - Standard streams and exit
 */

use std::error::Error;
use std::sync::Arc;
use tracing::info;

use parking_lot::Mutex;
use process_core::{init_tracing, EventArg, Process, ProcessConfig};

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let process = Process::builder()
        .with_config(ProcessConfig::from_env())
        .build();
    let out = process.stdout().clone();

    out.write_str("=== Process Probe ===\n\n")?;

    // 1. Identity
    out.write_str("1. Identity:\n")?;
    out.write_str(&format!("   Platform: {}\n", process.platform()))?;
    out.write_str(&format!("   Architecture: {}\n", process.arch()))?;
    out.write_str(&format!("   Version: {}\n", process.version()))?;
    out.write_str(&format!("   Process ID: {}\n", process.pid()))?;
    out.write_str(&format!("   Parent Process ID: {}\n", process.ppid()))?;
    out.write_str(&format!("   Title: {}\n", process.title()))?;
    for (component, version) in process.versions() {
        out.write_str(&format!("   {}: {}\n", component, version))?;
    }
    out.write_str(&format!("   argv: {:?}\n\n", process.argv()))?;

    // 2. Environment
    out.write_str("2. Environment:\n")?;
    for key in ["HOME", "PATH", "SHELL", "PROCESS_CORE_VERSION", "PROCESS_CORE_PLATFORM"] {
        let value = process.env(key).unwrap_or_else(|| "<unset>".to_string());
        out.write_str(&format!("   {}: {}\n", key, value))?;
    }
    out.write_str("\n")?;

    // 3. Working directory
    out.write_str("3. Working directory:\n")?;
    out.write_str(&format!("   cwd: {}\n", process.cwd()?.display()))?;
    if let Err(e) = process.chdir("./does-not-exist") {
        out.write_str(&format!("   Expected chdir failure: {}\n", e))?;
    }
    out.write_str("\n")?;

    // 4. Events
    out.write_str("4. Events:\n")?;
    let warnings = out.clone();
    process.on("warning", move |args| {
        let message = args.first().and_then(EventArg::as_str).unwrap_or_default();
        warnings.write_str(&format!("   Warning received: {}\n", message))?;
        Ok(())
    });
    process.emit_warning("probe warning")?;
    out.write_str("\n")?;

    // 5. Timing
    out.write_str("5. Timing:\n")?;
    let start = process.hrtime(None);
    let mut spin = 0u64;
    for i in 0..1_000_000u64 {
        spin = spin.wrapping_add(i);
    }
    let delta = process.hrtime(Some(start));
    out.write_str(&format!("   hrtime delta: {} (spin {})\n", delta, spin))?;
    out.write_str(&format!("   hrtime.bigint: {}\n", process.hrtime_bigint()))?;
    out.write_str(&format!("   uptime: {:.6}s\n\n", process.uptime()))?;

    // 6. Memory
    let memory = process.memory_usage();
    out.write_str("6. Memory:\n")?;
    out.write_str(&format!("   rss: {}\n", memory.rss))?;
    out.write_str(&format!("   heapTotal: {}\n", memory.heap_total))?;
    out.write_str(&format!("   heapUsed: {}\n", memory.heap_used))?;
    out.write_str(&format!("   external: {}\n\n", memory.external))?;

    // 7. Deferred tasks, nested scheduling runs in the same drain
    out.write_str("7. Deferred tasks:\n")?;
    let order = Arc::new(Mutex::new(Vec::new()));
    {
        let order = order.clone();
        let inner = process.clone();
        process.next_tick(move || {
            order.lock().push(1);
            let nested = order.clone();
            inner.next_tick(move || {
                nested.lock().push(3);
                Ok(())
            })?;
            Ok(())
        })?;
    }
    {
        let order = order.clone();
        process.next_tick(move || {
            order.lock().push(2);
            Ok(())
        })?;
    }
    process.drain_ticks()?;
    out.write_str(&format!("   Order: {:?}\n\n", order.lock()))?;

    // 8. Streams
    out.write_str("8. Streams:\n")?;
    process.stderr().write_str("   Direct write to stderr\n")?;
    if std::env::args().any(|arg| arg == "--stdin") {
        let echo = out.clone();
        process.stdin().on_data(move |line| {
            echo.write_str(&format!("   Received input: {}\n", line))?;
            Ok(())
        });
        let frames = process.stdin().pump_all()?;
        info!(frames, "Standard input drained");
    }
    out.write_str("\n")?;

    // 9. Exit from inside a deferred task
    let farewell = out.clone();
    process.on("exit", move |args| {
        let code = args.first().and_then(EventArg::as_i64).unwrap_or_default();
        farewell.write_str(&format!("=== Exit with code {} ===\n", code))?;
        Ok(())
    });
    {
        let exiting = process.clone();
        process.next_tick(move || {
            let runtime = exiting.uptime();
            info!(runtime, "Probe complete");
            exiting.exit(0)?;
            Ok(())
        })?;
    }

    let report = process.run()?;
    match process.exit(report.code)? {}
}
