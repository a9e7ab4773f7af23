use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::BIN_NAME;

#[derive(Args, Debug)]
pub struct ManArgs {
    /// Output directory (default: dist/share/man/man1)
    #[arg(long = "out-dir", default_value = "dist/share/man/man1")]
    pub out_dir: PathBuf,
}

pub fn cmd_man(args: ManArgs) -> Result<(), String> {
    let out_dir = crate::workspace_root().join(args.out_dir);
    fs::create_dir_all(&out_dir).map_err(|e| format!("{}: {e}", out_dir.display()))?;

    let cmd = git_auto::command();
    write_page(&out_dir, BIN_NAME, cmd.clone())?;

    // One page per subcommand: git-auto-tag.1, git-auto-delete-merged-branch.1, ...
    for subcommand in cmd.get_subcommands() {
        let page = format!("{BIN_NAME}-{}", subcommand.get_name());
        write_page(&out_dir, &page, subcommand.clone().name(page.clone()))?;
    }

    Ok(())
}

fn write_page(out_dir: &Path, page: &str, cmd: clap::Command) -> Result<(), String> {
    let mut buffer: Vec<u8> = Vec::new();
    clap_mangen::Man::new(cmd)
        .render(&mut buffer)
        .map_err(|e| format!("render manpage for {page}: {e}"))?;

    let man_path = out_dir.join(format!("{page}.1"));
    fs::write(&man_path, buffer).map_err(|e| format!("{}: {e}", man_path.display()))?;
    println!("wrote {}", man_path.display());
    Ok(())
}
