use std::{
    env,
    fs,
    path::{ Path, PathBuf },
    time::Instant,
};
use anyhow::{ bail, Context };
use ndarray as nd;
use num_complex::Complex64 as C64;
use svsim::{ compare, qasm };
use tracing_subscriber::EnvFilter;

fn timeit<F, T>(mut f: F) -> (T, f64)
where F: FnMut() -> T
{
    let t0 = Instant::now();
    let out: T = f();
    (out, (Instant::now() - t0).as_secs_f64())
}

// one amplitude per line, written as `re im`
fn read_reference(path: &Path) -> anyhow::Result<nd::Array1<C64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("couldn't read reference file {}", path.display()))?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(k, line)| -> anyhow::Result<C64> {
            let parts: Vec<f64> =
                line.split_whitespace()
                .map(|x| x.parse::<f64>())
                .collect::<Result<_, _>>()
                .with_context(|| format!("bad amplitude on line {}", k + 1))?;
            match parts.as_slice() {
                [re] => Ok(C64::new(*re, 0.0)),
                [re, im] => Ok(C64::new(*re, *im)),
                _ => bail!("expected `re im` on line {}", k + 1),
            }
        })
        .collect()
}

// all `.qasm` files under `dir`, recursively, in sorted order
fn collect_qasm(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut found: Vec<PathBuf> = Vec::new();
    let mut pending: Vec<PathBuf> = vec![dir.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("couldn't read directory {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "qasm") {
                found.push(path);
            }
        }
    }
    found.sort();
    Ok(found)
}

// simulate one circuit; `Some(matched)` if a reference was given
fn run_circuit(path: &Path, reference: Option<&Path>)
    -> anyhow::Result<Option<bool>>
{
    let src = fs::read_to_string(path)
        .with_context(|| format!("couldn't read circuit file {}", path.display()))?;

    print!("parse circuit ... ");
    let (circuit, t) = timeit(|| qasm::parse_circuit(&src));
    println!("{:.3e} secs", t);
    let circuit = circuit?;
    println!("{} qubit(s), {} operation(s)", circuit.num_qubits, circuit.ops.len());

    print!("simulate ... ");
    let (state, t) = timeit(|| circuit.simulate());
    println!("{:.3e} secs", t);
    let state = state?;
    println!("state = {}", state);

    let Some(ref_path) = reference else { return Ok(None); };
    let reference = read_reference(ref_path)?;
    let sv = state.state_vector();
    let tol = compare::Tolerance::default();
    match compare::first_mismatch(&sv, &reference, tol) {
        None => {
            println!("matches reference");
            Ok(Some(true))
        },
        Some(k) => {
            let ours = sv.get(k).copied();
            let theirs = reference.get(k).copied();
            println!("mismatch at index {k}: {ours:?} vs {theirs:?}");
            Ok(Some(false))
        },
    }
}

// run every circuit under `dir` against its sibling `<stem>.ref`, if any;
// returns (total, correct)
fn run_benchmarks(dir: &Path) -> anyhow::Result<(usize, usize)> {
    let circuits = collect_qasm(dir)?;
    let mut correct: usize = 0;
    for path in circuits.iter() {
        println!("== {}", path.display());
        let ref_path = path.with_extension("ref");
        let reference = ref_path.is_file().then_some(ref_path.as_path());
        match run_circuit(path, reference) {
            Ok(Some(true)) => { correct += 1; },
            Ok(Some(false)) => { },
            Ok(None) => { println!("no reference"); },
            Err(err) => { println!("failed: {err:#}"); },
        }
    }
    Ok((circuits.len(), correct))
}

// simulate a QASM file and print its state vector, optionally checking it
// against a reference; given a directory, run every `.qasm` file under it
// against its `<stem>.ref` and report how many matched
//
//   cargo run --example simulate -- circuit.qasm [reference.txt]
//   cargo run --example simulate -- demos/circuits
//
// set RUST_LOG=svsim=trace to see every applied gate
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        bail!("usage: simulate <circuit.qasm | directory> [reference.txt]");
    };

    if path.is_dir() {
        let (total, correct) = run_benchmarks(&path)?;
        let pct =
            if total == 0 { 0.0 } else { 100.0 * correct as f64 / total as f64 };
        println!("Total {total} benchmark(s), {correct} correct, {pct:.2}%");
        return Ok(());
    }

    let reference = args.next().map(PathBuf::from);
    if let Some(false) = run_circuit(&path, reference.as_deref())? {
        bail!("state does not match reference");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // fresh scratch directory under the system temp dir
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir()
            .join(format!("svsim-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn collects_nested_qasm() {
        let dir = scratch_dir("collect");
        fs::create_dir_all(dir.join("a/b")).unwrap();
        fs::write(dir.join("top.qasm"), "h q[0];\n").unwrap();
        fs::write(dir.join("a/b/deep.qasm"), "x q[1];\n").unwrap();
        fs::write(dir.join("a/notes.txt"), "").unwrap();
        fs::write(dir.join("a/top.ref"), "1 0\n").unwrap();
        let found = collect_qasm(&dir).unwrap();
        assert_eq!(found, vec![dir.join("a/b/deep.qasm"), dir.join("top.qasm")]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn benchmark_counts() {
        let dir = scratch_dir("bench");
        fs::create_dir_all(dir.join("sub")).unwrap();
        // correct: |1>
        fs::write(dir.join("flip.qasm"), "x q[0];\n").unwrap();
        fs::write(dir.join("flip.ref"), "0 0\n1 0\n").unwrap();
        // wrong reference: |+> is not |0>
        fs::write(dir.join("sub/plus.qasm"), "h q[0];\n").unwrap();
        fs::write(dir.join("sub/plus.ref"), "1 0\n0 0\n").unwrap();
        // no reference
        fs::write(dir.join("sub/bell.qasm"), "h q[0];\ncx q[0],q[1];\n").unwrap();
        // unsupported gate
        fs::write(dir.join("bad.qasm"), "y q[0];\n").unwrap();
        assert_eq!(run_benchmarks(&dir).unwrap(), (4, 1));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn bundled_circuits_match() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/circuits");
        assert_eq!(run_benchmarks(&dir).unwrap(), (1, 1));
    }
}
