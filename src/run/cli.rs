use anyhow::{bail, Context, Result};
use std::rc::Rc;

use vfxbudget::config::Config;
use vfxbudget::hierarchy::ProjectBrowser;
use vfxbudget::models::{LineItemKind, NodeEdit, NodeKind};
use vfxbudget::store::KeyValueStore;
use vfxbudget::workbook::{TabRegistry, Workbook, WorkbookOptions};

use super::report;

/// What an `add`/`remove`/`set` command operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Items(LineItemKind),
    Role,
    Production,
}

impl Target {
    fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "role" | "roles" => Ok(Self::Role),
            "production" | "prod" => Ok(Self::Production),
            other => LineItemKind::parse(other).map(Self::Items).ok_or_else(|| {
                anyhow::anyhow!("Unknown table: {s} (asset, shot, role, production)")
            }),
        }
    }
}

pub(crate) fn as_cli(args: &[String], store: Rc<dyn KeyValueStore>, config: &Config) -> Result<()> {
    let tab_flag = args
        .windows(2)
        .find(|w| w[0] == "--tab")
        .map(|w| w[1].clone());
    let positional = strip_flag(args.get(1..).unwrap_or_default(), "--tab");
    let command = positional.first().map(String::as_str).unwrap_or("summary");
    let params = positional.get(1..).unwrap_or_default();

    match command {
        "--help" | "-h" | "help" => {
            print_usage();
            return Ok(());
        }
        "--version" | "-V" | "version" => {
            println!("vfxbudget {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        "tabs" | "tab-new" | "tab-rename" | "tab-delete" => {
            return cli_tabs(command, params, store, tab_flag.as_deref());
        }
        "tree" | "node-add" | "node-delete" | "node-set" => {
            return cli_tree(command, params, store);
        }
        _ => {}
    }

    let tabs = TabRegistry::open(store.clone());
    let tab_id = tab_flag
        .or_else(|| config.default_tab.clone())
        .unwrap_or_else(|| tabs.first().id.clone());
    let Some(tab) = tabs.get(&tab_id) else {
        bail!("Unknown budget tab: {tab_id} (see `vfxbudget tabs`)");
    };
    let mut wb = Workbook::open(&tab.id, store, WorkbookOptions::from(config));

    match command {
        "summary" | "s" => {
            println!("{}", report::summary_report(&tab.name, &wb.summary()));
            Ok(())
        }
        "roles" => {
            println!("{}", report::roles_table(&wb));
            Ok(())
        }
        "assets" => {
            println!("{}", report::line_items_table(&wb, LineItemKind::Asset));
            Ok(())
        }
        "shots" => {
            println!("{}", report::line_items_table(&wb, LineItemKind::Shot));
            Ok(())
        }
        "production" => {
            println!("{}", report::production_table(&wb));
            Ok(())
        }
        "scenarios" => {
            println!("{}", report::scenarios_list(&wb));
            Ok(())
        }
        "scenario" => cli_scenario(params, &mut wb),
        "role-rename" => cli_role_rename(params, &mut wb),
        "add" => cli_add(params, &mut wb),
        "remove" | "rm" => cli_remove(params, &mut wb),
        "set" => cli_set(params, &mut wb),
        "export" => cli_export(params, &wb),
        other => {
            print_usage();
            bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("vfxbudget: VFX budget roll-up and project breakdown");
    println!();
    println!("Usage: vfxbudget [--tab <id>] [command]");
    println!();
    println!("Commands:");
    println!("  summary                           Totals and cost distribution (default)");
    println!("  roles | assets | shots            List a table with computed figures");
    println!("  production                        List production overhead items");
    println!("  scenarios                         List scenarios (* = active)");
    println!("  scenario use|new|save-as|delete <name>");
    println!("  scenario set <field> <value>      Edit the active scenario");
    println!("  role-rename <old> <new>           Rename a role everywhere it is used");
    println!("  add <asset|shot|role|production> [name]");
    println!("  remove <asset|shot|role|production> <id>");
    println!("  set <asset|shot|role|production> <id> <field> <value>");
    println!("  export [path]                     Write assets and shots to CSV");
    println!("  tabs                              List budget tabs");
    println!("  tab-new <name> | tab-rename <id> <name> | tab-delete <id>");
    println!("  tree [project|assets]             Print the project or asset hierarchy");
    println!("  node-add <parent> | node-delete <id> | node-set <id> <field> <value>");
    println!("  --help, -h                        Show this help");
    println!("  --version, -V                     Show version");
}

/// Drop `flag` and the value following it.
fn strip_flag(args: &[String], flag: &str) -> Vec<String> {
    let mut out = Vec::with_capacity(args.len());
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            iter.next();
            continue;
        }
        out.push(arg.clone());
    }
    out
}

fn param<'a>(params: &'a [String], idx: usize, usage: &str) -> Result<&'a str> {
    params
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| anyhow::anyhow!("Usage: vfxbudget {usage}"))
}

fn parse_id(raw: &str) -> Result<u64> {
    raw.trim()
        .parse()
        .with_context(|| format!("Invalid id: {raw}"))
}

fn cli_scenario(params: &[String], wb: &mut Workbook) -> Result<()> {
    const USAGE: &str = "scenario <use|new|save-as|delete|set> <name>";
    let action = param(params, 0, USAGE)?;
    if action == "set" {
        let field = param(params, 1, "scenario set <field> <value>")?;
        let value = param(params, 2, "scenario set <field> <value>")?;
        wb.edit_active_scenario_input(field, value)?;
        println!("{}", report::scenarios_list(wb));
        return Ok(());
    }

    let name = params.get(1..).unwrap_or_default().join(" ");
    if name.trim().is_empty() {
        bail!("Usage: vfxbudget {USAGE}");
    }
    match action {
        "use" | "switch" => wb.switch_scenario(&name)?,
        "new" | "create" => wb.create_scenario(&name)?,
        "save-as" => wb.save_scenario_as(&name)?,
        "delete" => {
            wb.delete_scenario(&name)?;
        }
        other => bail!("Unknown scenario action: {other}"),
    }
    println!("{}", report::scenarios_list(wb));
    Ok(())
}

fn cli_role_rename(params: &[String], wb: &mut Workbook) -> Result<()> {
    const USAGE: &str = "role-rename <old> <new>";
    let old = param(params, 0, USAGE)?;
    let new = param(params, 1, USAGE)?;
    let id = wb
        .roles()
        .find_by_name(old)
        .map(|r| r.id)
        .ok_or_else(|| anyhow::anyhow!("Team role '{old}' not found"))?;
    let changed = wb.rename_role(id, new)?;
    println!("Renamed '{old}' to '{new}' ({changed} row(s) updated)");
    Ok(())
}

fn cli_add(params: &[String], wb: &mut Workbook) -> Result<()> {
    let what = param(params, 0, "add <asset|shot|role|production> [name]")?;
    let target = Target::parse(what)?;
    let name = params.get(1..).unwrap_or_default().join(" ");
    let id = match target {
        Target::Items(kind) => {
            let id = wb.add_line_item(kind);
            if !name.trim().is_empty() {
                wb.edit_line_item_input(kind, id, "name", &name)?;
            }
            id
        }
        Target::Role if name.trim().is_empty() => wb.add_role(),
        Target::Role => wb.add_named_role(&name)?,
        Target::Production => wb.add_production_item(&name),
    };
    println!("Added {what} with id {id}");
    Ok(())
}

fn cli_remove(params: &[String], wb: &mut Workbook) -> Result<()> {
    const USAGE: &str = "remove <asset|shot|role|production> <id>";
    let target = Target::parse(param(params, 0, USAGE)?)?;
    let id = parse_id(param(params, 1, USAGE)?)?;
    let name = match target {
        Target::Items(kind) => wb.remove_line_item(kind, id)?.name,
        Target::Role => wb.remove_role(id)?.name,
        Target::Production => wb.remove_production_item(id)?.name,
    };
    println!("Removed '{name}'");
    Ok(())
}

fn cli_set(params: &[String], wb: &mut Workbook) -> Result<()> {
    const USAGE: &str = "set <asset|shot|role|production> <id> <field> <value>";
    let target = Target::parse(param(params, 0, USAGE)?)?;
    let id = parse_id(param(params, 1, USAGE)?)?;
    let field = param(params, 2, USAGE)?;
    let value = params.get(3..).unwrap_or_default().join(" ");
    match target {
        Target::Items(kind) => {
            wb.edit_line_item_input(kind, id, field, &value)?;
            println!("{}", report::line_items_table(wb, kind));
        }
        Target::Role => {
            wb.edit_role_input(id, field, &value)?;
            println!("{}", report::roles_table(wb));
        }
        Target::Production => {
            wb.edit_production_item_input(id, field, &value)?;
            println!("{}", report::production_table(wb));
        }
    }
    Ok(())
}

fn cli_export(params: &[String], wb: &Workbook) -> Result<()> {
    let output_path = params
        .first()
        .filter(|a| !a.starts_with('-'))
        .map(|a| shellexpand(a))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            let date = chrono::Local::now().format("%Y-%m-%d");
            format!("{home}/vfxbudget-{}-{date}.csv", wb.id())
        });

    let file = std::fs::File::create(&output_path)
        .with_context(|| format!("Failed to create {output_path}"))?;
    let count = report::write_line_items_csv(wb, file)?;
    println!("Exported {count} line items to {output_path}");
    Ok(())
}

fn cli_tabs(
    command: &str,
    params: &[String],
    store: Rc<dyn KeyValueStore>,
    current: Option<&str>,
) -> Result<()> {
    let mut tabs = TabRegistry::open(store);
    match command {
        "tab-new" => {
            let name = params.join(" ");
            let tab = tabs.create(&name)?;
            println!("Created budget tab {} ({})", tab.id, tab.name);
        }
        "tab-rename" => {
            const USAGE: &str = "tab-rename <id> <name>";
            let id = param(params, 0, USAGE)?;
            let name = params.get(1..).unwrap_or_default().join(" ");
            tabs.rename(id, &name)?;
        }
        "tab-delete" => {
            let id = param(params, 0, "tab-delete <id>")?;
            let removed = tabs.delete(id)?;
            println!("Deleted budget tab {} ({})", removed.id, removed.name);
        }
        _ => {}
    }
    let current = current
        .map(str::to_string)
        .unwrap_or_else(|| tabs.first().id.clone());
    println!("{}", report::tabs_list(tabs.tabs(), &current));
    Ok(())
}

fn cli_tree(command: &str, params: &[String], store: Rc<dyn KeyValueStore>) -> Result<()> {
    let mut browser = ProjectBrowser::open(store);
    match command {
        "node-add" => {
            let parent = param(params, 0, "node-add <parent>")?;
            let id = browser.add_child(parent)?;
            println!("Added {id} under {parent}");
        }
        "node-delete" => {
            let id = param(params, 0, "node-delete <id>")?;
            let count = browser.delete(id)?;
            println!("Deleted {count} node(s)");
        }
        "node-set" => {
            const USAGE: &str = "node-set <id> <field> <value>";
            let id = param(params, 0, USAGE)?;
            let field = param(params, 1, USAGE)?;
            let value = params.get(2..).unwrap_or_default().join(" ");
            let edit = NodeEdit::from_input(field, &value)
                .ok_or_else(|| anyhow::anyhow!("Unknown or malformed node field: {field}"))?;
            browser.update(id, edit)?;
        }
        _ => {}
    }

    let which = params
        .first()
        .filter(|_| command == "tree")
        .map(String::as_str)
        .unwrap_or("project");
    let kind = match which {
        "assets" | "asset" => NodeKind::AssetRoot,
        _ => NodeKind::Project,
    };
    let root = browser
        .tree()
        .roots()
        .into_iter()
        .find(|n| n.kind == kind)
        .map(|n| n.id.clone());
    match root {
        Some(root) => println!("{}", report::tree_outline(browser.tree(), &root)),
        None => println!("No {which} tree"),
    }
    Ok(())
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}
