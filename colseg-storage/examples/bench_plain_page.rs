use clap::Parser;
use colseg_datatype::BigInt;
use colseg_storage::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hint::black_box;
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(version, about = "Plain page build/scan/seek benchmark")]
struct Args {
    /// Number of values per page.
    #[arg(long, default_value_t = 8192)]
    rows_per_page: usize,
    /// Number of pages to build and scan.
    #[arg(long, default_value_t = 10_000)]
    pages: usize,
    /// Rows per batch of sequential scan.
    #[arg(long, default_value_t = 1024)]
    batch_size: usize,
    /// Number of value seeks.
    #[arg(long, default_value_t = 1_000_000)]
    seeks: usize,
}

fn main() {
    let args = Args::parse();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut vals: Vec<i64> = (0..args.rows_per_page)
        .map(|_| rng.random_range(0..1_000_000))
        .collect();
    vals.sort();
    let raw: &[u8] = bytemuck::cast_slice(&vals);

    let options = PageBuilderOptions::default().data_page_size(args.rows_per_page * 8);
    let mut builder = PlainPageBuilder::new(BigInt, options);
    let start = Instant::now();
    let mut total_bytes = 0;
    for _ in 0..args.pages {
        builder.reset();
        builder.add(raw);
        total_bytes += black_box(builder.finish().len());
    }
    let dur = start.elapsed();
    println!(
        "build: pages={}, rows_per_page={}, dur={}ms, bytes={}, rows/s={:.2}",
        args.pages,
        args.rows_per_page,
        dur.as_millis(),
        total_bytes,
        (args.pages * args.rows_per_page) as f64 / dur.as_secs_f64()
    );

    let page = builder.finish().to_vec();
    let mut block = vec![0u8; args.batch_size * 8];
    let start = Instant::now();
    let mut total_rows = 0;
    for _ in 0..args.pages {
        let mut decoder = PlainPageDecoder::new(BigInt, &page, PageDecoderOptions::default());
        decoder.init().unwrap();
        loop {
            let mut view = ColumnBlockView::new(&mut block, 8);
            let read = decoder.next_batch(args.batch_size, &mut view).unwrap();
            if read == 0 {
                break;
            }
            total_rows += read;
        }
    }
    let dur = start.elapsed();
    println!(
        "scan: pages={}, batch_size={}, dur={}ms, rows={}, rows/s={:.2}",
        args.pages,
        args.batch_size,
        dur.as_millis(),
        total_rows,
        total_rows as f64 / dur.as_secs_f64()
    );

    let targets: Vec<[u8; 8]> = (0..args.seeks)
        .map(|_| rng.random_range(0..1_000_000i64).to_le_bytes())
        .collect();
    let mut decoder = PlainPageDecoder::new(BigInt, &page, PageDecoderOptions::default());
    decoder.init().unwrap();
    let start = Instant::now();
    let mut found = 0usize;
    for t in &targets {
        if let Ok(true) = decoder.seek_at_or_after_value(t) {
            found += 1;
        }
    }
    let dur = start.elapsed();
    println!(
        "seek: count={}, found={}, dur={}ms, op={:.2}ns",
        args.seeks,
        found,
        dur.as_millis(),
        dur.as_nanos() as f64 / args.seeks as f64
    );
}
