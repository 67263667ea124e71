//! gridhost-smoke: release gate and demo harness for the widget bridge.
//!
//! Proves end-to-end against a scripted widget: construct -> set data ->
//! set settings -> retrieve round trips -> out-of-order responses ->
//! structural edits -> protocol violations fail fast.
//!
//! Exit codes:
//!   0 - All steps passed
//!   1 - A step failed (clean error message printed)
//!
//! Usage:
//!   gridhost-smoke
//!   gridhost-smoke --verbose
//!   gridhost-smoke --locale de_DE

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use clap::Parser;
use serde_json::json;

use gridhost::protocol::{Settings, WidgetFn};
use gridhost::{BridgeError, GridHost, HostConfig, WidgetHarness};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(name = "gridhost-smoke")]
#[command(about = "Widget bridge smoke test and demo harness")]
#[command(version)]
struct Args {
    /// Locale tag forwarded to the widget (underscores are normalized)
    #[arg(long, default_value = "en_US")]
    locale: String,

    /// Client-side mount target
    #[arg(long, default_value = "grid")]
    target: String,

    /// Verbose output (print every outbound call)
    #[arg(long, short)]
    verbose: bool,
}

struct Smoke {
    args: Args,
    harness: Arc<WidgetHarness>,
    host: Option<GridHost>,
    steps_run: usize,
    printed_calls: usize,
}

impl Smoke {
    fn new(args: Args) -> Self {
        Self {
            args,
            harness: Arc::new(WidgetHarness::new()),
            host: None,
            steps_run: 0,
            printed_calls: 0,
        }
    }

    fn host(&self) -> &GridHost {
        self.host.as_ref().expect("host constructed in step a")
    }

    fn run_step<F>(&mut self, name: &str, f: F) -> Result<(), String>
    where
        F: FnOnce(&mut Self) -> Result<String, String>,
    {
        self.steps_run += 1;
        match f(self) {
            Ok(detail) => {
                println!("\x1b[32m✓\x1b[0m {}: {}", name, detail);
                if self.args.verbose {
                    let calls = self.harness.calls();
                    for call in &calls[self.printed_calls..] {
                        eprintln!("  >>> {} {}", call.function, json!(call.args));
                    }
                    self.printed_calls = calls.len();
                }
                Ok(())
            }
            Err(e) => {
                println!("\x1b[31m✗\x1b[0m {}: {}", name, e);
                Err(e)
            }
        }
    }

    fn step_a_construct(&mut self) -> Result<String, String> {
        let config = HostConfig {
            target: self.args.target.clone(),
            locale: Some(self.args.locale.clone()),
        };
        let data = json!([["Region", "Total"], ["North", 42], ["South", 17]]);
        let host = GridHost::with_data(self.harness.clone(), config, data)
            .map_err(|e| e.to_string())?;

        let calls = self.harness.calls();
        if calls.len() != 1 {
            return Err(format!("expected 1 bootstrap call, saw {}", calls.len()));
        }
        let locale = calls[0].args[1].as_str().unwrap_or("").to_string();
        self.host = Some(host);
        Ok(format!("target={} locale={}", self.args.target, locale))
    }

    fn step_b_set_paths(&mut self) -> Result<String, String> {
        let host = self.host();
        host.set_data(&json!([["a", "b"], ["c", "d"]]))
            .map_err(|e| e.to_string())?;
        host.set_data_at_cell(1, 1, "99").map_err(|e| e.to_string())?;
        host.set_settings(&Settings {
            read_only: Some(false),
            min_spare_rows: Some(1),
            ..Default::default()
        })
        .map_err(|e| e.to_string())?;

        Ok(format!("{} outbound calls", self.harness.call_count()))
    }

    fn step_c_retrieve_rows(&mut self) -> Result<String, String> {
        let received = Arc::new(Mutex::new(None));
        let slot = received.clone();
        self.host()
            .retrieve_data_as_array(move |rows| {
                *slot.lock().unwrap() = Some(rows);
            })
            .map_err(|e| e.to_string())?;

        let token = self
            .harness
            .last_token_for(WidgetFn::RetrieveDataAsArray.name())
            .ok_or("no token dispatched")?;
        self.host()
            .receive_rows(&token, r#"[["a","b"],["c",99]]"#)
            .map_err(|e| e.to_string())?;

        let rows = received
            .lock()
            .unwrap()
            .take()
            .ok_or("handler never invoked")?;
        if rows[1][1] != "99" {
            return Err(format!("scalar not coerced: {:?}", rows[1][1]));
        }
        Ok(format!("{} rows, scalars coerced", rows.len()))
    }

    fn step_d_out_of_order(&mut self) -> Result<String, String> {
        let first = Arc::new(Mutex::new(None));
        let second = Arc::new(Mutex::new(None));

        let slot = first.clone();
        self.host()
            .retrieve_data_at_cell(0, 0, move |v| *slot.lock().unwrap() = Some(v))
            .map_err(|e| e.to_string())?;
        let slot = second.clone();
        self.host()
            .retrieve_data_at_cell(0, 1, move |v| *slot.lock().unwrap() = Some(v))
            .map_err(|e| e.to_string())?;

        let calls = self.harness.calls_to(WidgetFn::RetrieveDataAtCell.name());
        let token_first = calls[calls.len() - 2].args[2].as_str().unwrap().to_string();
        let token_second = calls[calls.len() - 1].args[2].as_str().unwrap().to_string();

        // Reply to the second request first.
        self.host()
            .receive_cell_value(&token_second, "beta")
            .map_err(|e| e.to_string())?;
        self.host()
            .receive_cell_value(&token_first, "alpha")
            .map_err(|e| e.to_string())?;

        let first_val = first.lock().unwrap().take();
        let second_val = second.lock().unwrap().take();
        match (first_val.as_deref(), second_val.as_deref()) {
            (Some("alpha"), Some("beta")) => Ok("routed by token, not call order".to_string()),
            other => Err(format!("misrouted responses: {:?}", other)),
        }
    }

    fn step_e_structural_edits(&mut self) -> Result<String, String> {
        let host = self.host();
        host.insert_row(1, 2).map_err(|e| e.to_string())?;
        host.remove_col(0, 1).map_err(|e| e.to_string())?;

        let alters = self.harness.calls_to(WidgetFn::Alter.name());
        Ok(format!("{} alter calls", alters.len()))
    }

    fn step_f_violations(&mut self) -> Result<String, String> {
        let invocations = Arc::new(AtomicUsize::new(0));
        let count = invocations.clone();
        self.host()
            .retrieve_cells_meta(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            })
            .map_err(|e| e.to_string())?;
        let token = self
            .harness
            .last_token_for(WidgetFn::RetrieveCellsMeta.name())
            .ok_or("no token dispatched")?;

        // Malformed element 2 of 3: whole payload fails, handler not invoked.
        match self.host().receive_cells_meta(
            &token,
            r#"[{"row":0,"col":0},{"oops":true},{"row":2,"col":2}]"#,
        ) {
            Err(BridgeError::Decode { .. }) => {}
            other => return Err(format!("expected Decode failure, got {:?}", other)),
        }
        if invocations.load(Ordering::SeqCst) != 0 {
            return Err("handler invoked despite decode failure".to_string());
        }

        // The token was consumed by the failed receive.
        match self.host().receive_cells_meta(&token, "[]") {
            Err(BridgeError::TokenNotFound { .. }) => {}
            other => return Err(format!("expected TokenNotFound, got {:?}", other)),
        }

        // Unwired operation fails synchronously.
        match self.host().merge_cells(0, 0, 2, 2) {
            Err(BridgeError::Unsupported(_)) => {}
            other => return Err(format!("expected Unsupported, got {:?}", other)),
        }

        Ok("decode/token/unsupported all fail fast".to_string())
    }

    fn step_g_channel_close(&mut self) -> Result<String, String> {
        self.harness.close();
        match self.host().set_data(&json!([["x"]])) {
            Err(BridgeError::ChannelClosed) => {}
            other => return Err(format!("expected ChannelClosed, got {:?}", other)),
        }
        match self.host().retrieve_data(|_| {}) {
            Err(BridgeError::ChannelClosed) => {}
            other => return Err(format!("expected ChannelClosed, got {:?}", other)),
        }
        Ok("closed channel propagates".to_string())
    }

    fn run(&mut self) -> Result<(), String> {
        println!("\n\x1b[1mgridhost widget bridge smoke test\x1b[0m\n");

        self.run_step("construct", |s| s.step_a_construct())?;
        self.run_step("setters", |s| s.step_b_set_paths())?;
        self.run_step("retrieve_rows", |s| s.step_c_retrieve_rows())?;
        self.run_step("out_of_order", |s| s.step_d_out_of_order())?;
        self.run_step("structural_edits", |s| s.step_e_structural_edits())?;
        self.run_step("violations", |s| s.step_f_violations())?;
        self.run_step("channel_close", |s| s.step_g_channel_close())?;

        println!(
            "\nAll {} steps passed ({} outbound calls, {} still pending)",
            self.steps_run,
            self.host().calls_dispatched(),
            self.host().pending_responses()
        );
        Ok(())
    }
}

fn main() {
    let args = Args::parse();
    let mut smoke = Smoke::new(args);

    if let Err(e) = smoke.run() {
        eprintln!("\nSmoke test failed: {}", e);
        std::process::exit(1);
    }
}
