use std::io::Write;

use structopt::StructOpt;

use legypte::models::KeepOrder;
use legypte::FlickrArgs;

/// Fetch one gallery from Flickr and print it as JSON.
#[derive(StructOpt)]
struct DumpArgs {
    #[structopt(flatten)]
    flickr: FlickrArgs,

    /// Keep Flickr's order instead of shuffling.
    #[structopt(long)]
    keep_order: bool,

    /// Flickr username, or "default" for the shared photoset.
    #[structopt(name = "OWNER", default_value = "default")]
    owner: String,
}

#[async_std::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    legypte::telemetry::init()?;

    let args = DumpArgs::from_args();
    let mut aggregator = args.flickr.aggregator();
    if args.keep_order {
        aggregator = aggregator.with_order(KeepOrder);
    }

    let gallery = aggregator.try_aggregate(&args.owner).await?;
    tracing::info!(
        "{} images, {} tags",
        gallery.images.len(),
        gallery
            .sources
            .values()
            .map(|source| source.tags.len())
            .sum::<usize>()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &gallery)?;
    writeln!(out)?;

    Ok(())
}
