use blueprint_core::explorer::render_explorer;

use crate::cli::ExplorerArgs;
use crate::{opener, output};

pub fn handle(args: &ExplorerArgs) -> anyhow::Result<()> {
    let bundle = output::read_bundle(&args.bundle)?;
    let html = render_explorer(&bundle, &args.url);

    let path = args.out.clone().unwrap_or_else(|| {
        args.bundle
            .parent()
            .map(|dir| dir.join(output::EXPLORER_FILE))
            .unwrap_or_else(|| output::EXPLORER_FILE.into())
    });
    output::write_explorer(&path, &html)?;
    println!("wrote {}", path.display());

    if args.open {
        opener::open_in_browser(&path)?;
    }
    Ok(())
}
