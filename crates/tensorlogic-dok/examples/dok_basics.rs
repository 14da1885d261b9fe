//! Basic DOK array usage example.
//!
//! Builds a sparse array from a coordinate map, reads and writes through
//! integer, slice and list indices, and converts between formats.

use tensorlogic_dok::{DType, DenseArray, Dok, DokData, Format, Slice};

fn main() -> anyhow::Result<()> {
    println!("=== DOK Basics ===\n");

    // A short key fills the trailing axis; a sequence spreads along it
    let data = DokData::new()
        .insert((0, 1), 3i64)
        .insert((1, 2, 3), 4i64)
        .insert((1, 1), vec![6i64, 5, 4, 1]);
    let mut s = Dok::from_data((2, 3, 4), data, None)?;
    println!("Built {:?} array of {}", s.shape(), s.dtype());
    println!("  nnz = {}, density = {:.3}\n", s.nnz(), s.density());

    println!("Reading...");
    let first = s.get((1, 1, 0))?.into_scalar().unwrap_or(DType::I64.zero());
    println!("  s[1, 1, 0] = {}", first);
    let row = s.get((1, 1, Slice::full()))?.to_dense();
    println!("  s[1, 1, :] = {:?}", row.to_array::<i64>().iter().copied().collect::<Vec<_>>());
    let picked = s.get((vec![0, 1], vec![1, 2], vec![0, 3]))?.to_dense();
    let picked: Vec<i64> = picked.to_array::<i64>().iter().copied().collect();
    println!("  s[[0, 1], [1, 2], [0, 3]] = {:?}\n", picked);

    println!("Writing...");
    s.set((0, 1, 1..3), 0i64)?;
    println!("  zeroed s[0, 1, 1:3], nnz = {}", s.nnz());
    s.set((.., 0, ..), vec![9i64, 8, 7, 6])?;
    println!("  broadcast a row into s[:, 0, :], nnz = {}", s.nnz());

    match s.set(vec![0, 1], 1i64) {
        Err(e) if e.is_unsupported() => println!("  lone list on a 3-d array: {}", e),
        other => anyhow::bail!("expected an unsupported-index error, got {:?}", other),
    }
    println!();

    println!("Converting...");
    let coo = s.to_coo();
    println!("  COO with {} entries, sorted = {}", coo.nnz(), coo.is_sorted());
    let dense = s.asformat_to("dense".parse::<Format>()?).to_dense();
    println!("  dense dtype = {}, size = {}", dense.dtype(), dense.size());
    let back = Dok::from_dense(&dense);
    anyhow::ensure!(back == s, "dense round trip changed the array");

    let z = Dok::zeros_like(&DenseArray::zeros(&[4, 4], DType::U8));
    println!("  zeros_like: {:?} {} with nnz {}", z.shape(), z.dtype(), z.nnz());

    Ok(())
}
