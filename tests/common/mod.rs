#![allow(dead_code)]

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use std::time::{SystemTime, UNIX_EPOCH};

use app_drawer::catalog::entry::{AppEntry, ComponentName, UserHandle};
use app_drawer::catalog::ordering::{CaseInsensitiveCollator, TitleCollator};
use app_drawer::sections::model::DisplayItem;

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
    pub log_path: PathBuf,
}

fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

fn resolve_bin_path() -> PathBuf {
    if let Some(path) = option_env!("CARGO_BIN_EXE_app-drawer") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) {
        "app-drawer.exe"
    } else {
        "app-drawer"
    };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve app-drawer binary path for integration test"),
    }
}

/// Run the binary with a scratch HOME so no real user config leaks in.
pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    let root = std::env::temp_dir().join("app-drawer-test-logs");
    fs::create_dir_all(&root).expect("create temp test log dir");
    let home = root.join(format!("home-{}-{}", sanitize(case_name), now_millis()));
    fs::create_dir_all(&home).expect("create scratch home");

    let log_path = root.join(format!("{}-{}.log", sanitize(case_name), now_millis()));
    let bin_path = resolve_bin_path();

    let output = Command::new(&bin_path)
        .args(args)
        .env("HOME", &home)
        .env_remove("APP_DRAWER_OUTPUT_FORMAT")
        .env_remove("APP_DRAWER_LAYOUT_COLUMNS")
        .env("RUST_BACKTRACE", "1")
        .output()
        .expect("execute app-drawer command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let mut log_content = String::new();
    log_content.push_str(&format!("case={case_name}\n"));
    log_content.push_str(&format!("bin={}\n", bin_path.display()));
    log_content.push_str(&format!("args={args:?}\n"));
    log_content.push_str(&format!("status={}\n", output.status));
    log_content.push_str("----- stdout -----\n");
    log_content.push_str(&stdout);
    log_content.push('\n');
    log_content.push_str("----- stderr -----\n");
    log_content.push_str(&stderr);
    log_content.push('\n');
    fs::write(&log_path, log_content).expect("write test log");

    CmdResult {
        status: output.status,
        stdout,
        stderr,
        log_path,
    }
}

// ──────────────────── fixtures ────────────────────

/// App for the primary user, package derived from the title.
pub fn app(title: &str) -> AppEntry {
    app_for(title, 0)
}

pub fn app_for(title: &str, user: u32) -> AppEntry {
    let package = format!(
        "com.example.{}",
        title
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_lowercase()
    );
    AppEntry::new(
        ComponentName::new(package.clone(), format!("{package}.Main")),
        UserHandle(user),
        title,
    )
}

pub fn apps(titles: &[&str]) -> Vec<AppEntry> {
    titles.iter().map(|title| app(title)).collect()
}

/// `count` apps per letter, e.g. `letter_block('B', 3)` → "B00", "B01", "B02".
pub fn letter_block(letter: char, count: usize) -> Vec<AppEntry> {
    (0..count).map(|n| app(&format!("{letter}{n:02}"))).collect()
}

/// Write a catalog JSON file with the given `(title, user)` apps.
pub fn write_catalog(dir: &Path, name: &str, apps: &[(&str, u32)], primary_user: u32) -> PathBuf {
    let entries: Vec<serde_json::Value> = apps
        .iter()
        .map(|(title, user)| {
            let entry = app_for(title, *user);
            serde_json::json!({
                "component": entry.component.to_string(),
                "user": user,
                "title": title,
            })
        })
        .collect();
    let payload = serde_json::json!({
        "primary_user": primary_user,
        "user_priorities": { "0": 0, "10": 1 },
        "apps": entries,
    });
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(&payload).expect("serialize catalog"))
        .expect("write catalog");
    path
}

/// Structural invariants plus title order under the default collator.
pub fn assert_list_invariants(list: &app_drawer::drawer::AppsList) {
    assert_layout_invariants(list);
    assert!(
        list.apps()
            .windows(2)
            .all(|pair| CaseInsensitiveCollator.compare(&pair[0].title, &pair[1].title) != Ordering::Greater),
        "registry not sorted by title"
    );
}

/// Structural invariants every completed rebuild must satisfy, whatever the collator.
pub fn assert_layout_invariants(list: &app_drawer::drawer::AppsList) {
    let items = list.display_items();
    for (index, item) in items.iter().enumerate() {
        assert_eq!(item.position(), index, "position drift at {index}");
        if list.has_filter() {
            assert!(!item.is_section_header(), "header under filter at {index}");
        }
    }
    for (id, section) in list.sections().iter().enumerate() {
        let slots = items
            .iter()
            .filter_map(DisplayItem::as_app_slot)
            .filter(|slot| slot.section.0 == id)
            .count();
        assert_eq!(slots, section.num_apps, "count drift in section {id}");
        let first = section.first_app_item.expect("section without slots");
        assert_eq!(items[first].section().0, id);
        assert!(!items[first].is_section_header());
    }
    let slot_count = items.iter().filter(|item| !item.is_section_header()).count();
    assert_eq!(slot_count, list.filtered_count());
    assert_eq!(list.fast_scroll_sections().len(), list.sections().len());
    assert!(
        list.sections()
            .windows(2)
            .all(|pair| pair[0].fraction < pair[1].fraction),
        "section fractions not increasing"
    );
}

/// Collator answering Less/Equal/Greater from an xorshift stream, ignoring its input.
pub fn coin_flip_collator(seed: u64) -> impl Fn(&str, &str) -> Ordering + 'static {
    let state = std::cell::Cell::new(seed | 1);
    move |_: &str, _: &str| {
        let mut x = state.get();
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        state.set(x);
        match x % 3 {
            0 => Ordering::Less,
            1 => Ordering::Equal,
            _ => Ordering::Greater,
        }
    }
}
