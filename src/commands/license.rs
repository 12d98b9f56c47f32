use clap::Args;

use buildhelper::license::{normalize_tree, NormalizeOptions, NormalizeReport};
use buildhelper::paths;

use super::{CmdResult, GlobalArgs};

#[derive(Args)]
pub struct LicenseArgs {
    /// Directory to scan (defaults to `license.root` from buildhelper.json)
    #[arg(long, value_name = "DIR")]
    pub root: Option<String>,

    /// Report files that would change without rewriting them
    #[arg(long)]
    pub dry_run: bool,
}

pub fn run(args: LicenseArgs, _global: &GlobalArgs) -> CmdResult<NormalizeReport> {
    let project_root = paths::project_root()?;
    let options = NormalizeOptions::for_project(&project_root, args.root.as_deref(), args.dry_run)?;

    let report = normalize_tree(&options)?;
    let exit_code = if report.has_failures() { 1 } else { 0 };

    Ok((report, exit_code))
}
