use std::env;
use std::fs;
use std::path::PathBuf;

use story::{SectionId, ViewportProfile};
use tools::{Issue, build_manifest, check_data, check_tables, plan};

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "plan" => cmd_plan(args),
        "check" => cmd_check(args),
        "manifest" => cmd_manifest(args),
        _ => Err(usage()),
    }
}

fn parse_profile(value: &str) -> Result<ViewportProfile, String> {
    match value {
        "desktop" => Ok(ViewportProfile::Desktop),
        "mobile" => Ok(ViewportProfile::Mobile),
        other => Err(format!("unknown profile: {other} (expected desktop|mobile)")),
    }
}

fn take_value(args: &[String], i: &mut usize, flag: &str) -> Result<String, String> {
    *i += 1;
    args.get(*i)
        .cloned()
        .ok_or_else(|| format!("{flag} requires a value"))
}

fn cmd_plan(args: Vec<String>) -> Result<(), String> {
    // storyboard plan [--profile desktop|mobile] [--section NAME]
    let mut profile = ViewportProfile::Desktop;
    let mut section: Option<SectionId> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--profile" => profile = parse_profile(&take_value(&args, &mut i, "--profile")?)?,
            "--section" => {
                let name = take_value(&args, &mut i, "--section")?;
                section = Some(
                    SectionId::from_name(&name).ok_or_else(|| format!("unknown section: {name}"))?,
                );
            }
            s => return Err(format!("unknown arg: {s}\n\n{}", usage())),
        }
        i += 1;
    }

    let mut sections = plan(profile)?;
    if let Some(only) = section {
        sections.retain(|s| s.section == only);
    }
    let payload = serde_json::to_string_pretty(&sections).map_err(|e| format!("json: {e}"))?;
    println!("{payload}");
    Ok(())
}

fn cmd_check(args: Vec<String>) -> Result<(), String> {
    // storyboard check [--data DIR]
    let mut data_dir: Option<PathBuf> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--data" => data_dir = Some(PathBuf::from(take_value(&args, &mut i, "--data")?)),
            s => return Err(format!("unknown arg: {s}\n\n{}", usage())),
        }
        i += 1;
    }

    let mut issues: Vec<Issue> = Vec::new();
    issues.extend(check_tables(ViewportProfile::Desktop));
    issues.extend(check_tables(ViewportProfile::Mobile));
    if let Some(dir) = &data_dir {
        issues.extend(check_data(dir));
    }

    for issue in &issues {
        eprintln!("  {issue}");
    }
    if issues.is_empty() {
        println!("ok: story tables{}", if data_dir.is_some() { " and datasets" } else { "" });
        Ok(())
    } else {
        Err(format!("{} issue(s) found", issues.len()))
    }
}

fn cmd_manifest(args: Vec<String>) -> Result<(), String> {
    // storyboard manifest <data_dir> [--out FILE]
    let Some(first) = args.first() else {
        return Err(usage());
    };
    let data_dir = PathBuf::from(first);
    let mut out = data_dir.join("manifest.json");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--out" => out = PathBuf::from(take_value(&args, &mut i, "--out")?),
            s => return Err(format!("unknown arg: {s}\n\n{}", usage())),
        }
        i += 1;
    }

    let manifest = build_manifest(&data_dir)?;
    if manifest.datasets.is_empty() {
        return Err(format!("no datasets found in {data_dir:?}"));
    }
    let payload = serde_json::to_string_pretty(&manifest).map_err(|e| format!("json: {e}"))?;
    fs::write(&out, payload).map_err(|e| format!("write {out:?}: {e}"))?;
    println!("wrote {out:?} ({} datasets)", manifest.datasets.len());
    Ok(())
}

fn usage() -> String {
    let exe = env::args().next().unwrap_or_else(|| "storyboard".to_string());
    format!(
        "Usage:\n  {exe} plan [--profile desktop|mobile] [--section NAME]\n  {exe} check [--data DIR]\n  {exe} manifest <data_dir> [--out FILE]\n\nNotes:\n- `plan` prints every section's step table and layer ids as JSON.\n- `check` validates both viewport profiles; with --data it also parses each dataset.\n- `manifest` hashes the datasets with blake3 and writes `manifest.json`.\n"
    )
}
