use chrono::NaiveDate;
use cpm_core::config::LOG_FILTER_VAR;
use cpm_core::{
    DatedPlan, ServiceConfig, TaskId, TaskStore, load_store_from_json, logging, save_plan_to_csv,
    save_plan_to_json, save_store_to_json,
};
use std::io::{self, Write};

fn render_row(cells: &[&str], widths: &[usize]) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.iter().enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.chars().count())));
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    // Compute column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            if width > widths[ci] {
                widths[ci] = width;
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(headers, &widths));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&cells, &widths));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_tasks(store: &TaskStore) -> String {
    let rows: Vec<Vec<String>> = store
        .list_tasks()
        .iter()
        .map(|task| {
            let predecessors = store
                .dependencies()
                .iter()
                .filter(|dep| dep.to == task.id)
                .map(|dep| dep.from.to_string())
                .collect::<Vec<_>>()
                .join(",");
            vec![
                task.id.to_string(),
                task.title.clone(),
                task.duration_days.to_string(),
                predecessors,
                task.created_at.date_naive().to_string(),
            ]
        })
        .collect();
    render_text_table(
        &["id", "title", "duration_days", "predecessors", "created"],
        &rows,
    )
}

fn render_plan(plan: &DatedPlan) -> String {
    let rows: Vec<Vec<String>> = plan
        .tasks
        .iter()
        .map(|task| {
            vec![
                task.id.to_string(),
                task.title.clone(),
                task.duration_days.to_string(),
                task.earliest_start_date.to_string(),
                task.earliest_finish_date.to_string(),
                task.latest_start_date.to_string(),
                task.latest_finish_date.to_string(),
                task.slack_days.to_string(),
                if task.is_critical { "yes" } else { "" }.to_string(),
            ]
        })
        .collect();
    render_text_table(
        &["id", "title", "days", "es", "ef", "ls", "lf", "slack", "critical"],
        &rows,
    )
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               List tasks and their predecessors\n  add <duration_days> <title...>     Create a task\n  delete <id>                        Delete a task and its dependencies\n  dep <from> <to>                    Add dependency (from finishes before to starts)\n  undep <from> <to>                  Remove dependency\n  check <from> <to>                  Report whether a dependency would create a cycle\n  order                              Show topological execution order\n  layers                             Show dependency layers\n  plan                               Compute and show the critical path schedule\n  start <YYYY-MM-DD|auto>            Pin or reset the project start date\n  save <path>                        Save project to JSON\n  load <path>                        Load project from JSON\n  export <json|csv> <path>           Export computed plan\n  quit|exit                          Exit"
    );
}

struct Session {
    store: TaskStore,
    project_start: Option<NaiveDate>,
}

impl Session {
    fn plan(&self) -> Result<(DatedPlan, String), String> {
        let schedule = self.store.schedule().map_err(|e| e.to_string())?;
        let start = self
            .project_start
            .unwrap_or_else(|| self.store.default_project_start());
        let plan = DatedPlan::new(&schedule, self.store.dependencies(), start)
            .map_err(|e| e.to_string())?;
        Ok((plan, schedule.summary().to_cli_summary()))
    }
}

enum Flow {
    Continue,
    Quit,
}

fn parse_id(value: Option<&str>, what: &str) -> Result<TaskId, String> {
    let raw = value.ok_or_else(|| format!("missing {what}"))?;
    raw.parse::<TaskId>()
        .map_err(|_| format!("{what} must be an integer (got '{raw}')"))
}

fn parse_pair<'a>(parts: &mut impl Iterator<Item = &'a str>) -> Result<(TaskId, TaskId), String> {
    let from = parse_id(parts.next(), "from id")?;
    let to = parse_id(parts.next(), "to id")?;
    Ok((from, to))
}

fn run_command(session: &mut Session, input: &str) -> Result<Flow, String> {
    let mut parts = input.split_whitespace();
    let Some(cmd) = parts.next() else {
        return Ok(Flow::Continue);
    };

    match cmd {
        "help" => print_help(),
        "quit" | "exit" => return Ok(Flow::Quit),
        "show" => print!("{}", render_tasks(&session.store)),
        "add" => {
            let raw = parts.next().ok_or("usage: add <duration_days> <title...>")?;
            let duration = raw
                .parse::<i64>()
                .map_err(|_| format!("duration must be an integer (got '{raw}')"))?;
            let title = parts.collect::<Vec<_>>().join(" ");
            let task = session
                .store
                .create_task(&title, Some(duration))
                .map_err(|e| e.to_string())?;
            println!(
                "Created task {} ({}, {}d).",
                task.id, task.title, task.duration_days
            );
        }
        "delete" => {
            let id = parse_id(parts.next(), "task id")?;
            session.store.delete_task(id).map_err(|e| e.to_string())?;
            println!("Deleted task {id}.");
        }
        "dep" => {
            let (from, to) = parse_pair(&mut parts)?;
            session
                .store
                .add_dependency(from, to)
                .map_err(|e| e.to_string())?;
            println!("Added dependency {from} -> {to}.");
        }
        "undep" => {
            let (from, to) = parse_pair(&mut parts)?;
            session
                .store
                .remove_dependency(from, to)
                .map_err(|e| e.to_string())?;
            println!("Removed dependency {from} -> {to}.");
        }
        "check" => {
            let (from, to) = parse_pair(&mut parts)?;
            let cyclic = session
                .store
                .check_dependency(from, to)
                .map_err(|e| e.to_string())?;
            if cyclic {
                println!("Adding {from} -> {to} would create a cycle.");
            } else {
                println!("Adding {from} -> {to} is safe.");
            }
        }
        "order" => {
            let order = session.store.execution_order().map_err(|e| e.to_string())?;
            if order.is_empty() {
                println!("Execution order: (empty)");
            } else {
                let ids = order
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("Execution order: {ids}");
            }
        }
        "layers" => {
            let layers = session.store.layers().map_err(|e| e.to_string())?;
            for (idx, layer) in layers.iter().enumerate() {
                let ids = layer
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("Layer {idx}: {ids}");
            }
        }
        "plan" => {
            let (plan, summary) = session.plan()?;
            print!("{}", render_plan(&plan));
            println!(
                "Project start {} finish {} ({} days)",
                plan.project_start_date, plan.project_finish_date, plan.project_duration_days
            );
            println!("Summary: {summary}");
        }
        "start" => match parts.next() {
            Some("auto") => {
                session.project_start = None;
                println!("Project start follows the earliest task creation day.");
            }
            Some(raw) => {
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|_| format!("invalid date '{raw}' (expected YYYY-MM-DD)"))?;
                session.project_start = Some(date);
                println!("Project start set to {date}.");
            }
            None => return Err("usage: start <YYYY-MM-DD|auto>".into()),
        },
        "save" => {
            let path = parts.next().ok_or("usage: save <path>")?;
            save_store_to_json(&session.store, path).map_err(|e| e.to_string())?;
            println!("Project saved to {path}.");
        }
        "load" => {
            let path = parts.next().ok_or("usage: load <path>")?;
            session.store = load_store_from_json(path).map_err(|e| e.to_string())?;
            println!("Project loaded from {path}.");
        }
        "export" => {
            let format = parts.next().ok_or("usage: export <json|csv> <path>")?;
            let path = parts.next().ok_or("usage: export <json|csv> <path>")?;
            let (plan, _) = session.plan()?;
            match format {
                "json" => save_plan_to_json(&plan, path).map_err(|e| e.to_string())?,
                "csv" => save_plan_to_csv(&plan, path).map_err(|e| e.to_string())?,
                other => return Err(format!("unknown export format '{other}'")),
            }
            println!("Plan exported to {path}.");
        }
        other => return Err(format!("unknown command '{other}' (type 'help')")),
    }
    Ok(Flow::Continue)
}

fn main() {
    let config = ServiceConfig::from_env().unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        ServiceConfig::default()
    });
    // Keep the REPL quiet unless logging was asked for explicitly.
    let filter = if std::env::var_os(LOG_FILTER_VAR).is_some() {
        config.log_filter.as_str()
    } else {
        "warn"
    };
    logging::init_logging(filter);

    let mut session = Session {
        store: TaskStore::new(),
        project_start: config.project_start,
    };

    println!("CPM Tool (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        match run_command(&mut session, input) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(message) => println!("Error: {message}"),
        }
    }
}
