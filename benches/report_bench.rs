use compile_matrix::core::classify::{Classification, classify};
use compile_matrix::core::models::{CellResult, CompileOutcome, FileResult, Termination};
use compile_matrix::reporting::html::{ReportContext, render_report};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::time::Duration;

const COMPILERS: [&str; 7] = [
    "g++-4.4_gnu++0x",
    "g++-4.3_gnu++0x",
    "g++-4.4",
    "g++-4.3",
    "g++-4.2",
    "g++-4.1",
    "llvm-g++-4.2",
];

fn sample_results(files: usize) -> Vec<FileResult> {
    (0..files)
        .map(|i| {
            let file = PathBuf::from(format!("examples/example{i}.cpp"));
            let cells = COMPILERS
                .iter()
                .enumerate()
                .map(|(j, compiler)| {
                    let (termination, classification) = match (i + j) % 5 {
                        0 => (Termination::Exited(1), Classification::Fail),
                        1 => (Termination::Exited(0), Classification::Warn),
                        _ => (Termination::Exited(0), Classification::Pass),
                    };
                    CellResult {
                        outcome: CompileOutcome {
                            compiler: compiler.to_string(),
                            log_path: PathBuf::from(format!(
                                "/work/compiler_messages/examples_example{i}.cpp__{compiler}.log"
                            )),
                            termination,
                            duration: Duration::from_millis(1200),
                        },
                        classification,
                    }
                })
                .collect();
            FileResult { file, cells }
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let mut log = String::from("*** configuration: g++-4.4\n*** file: vector.cpp\n\n");
    for line in 0..2000 {
        log.push_str(&format!("vector.hpp:{line}: note: instantiated from here\n"));
    }
    log.push_str("vector.hpp:2001: Warning: unused variable 'x'\n");

    c.bench_function("classify_large_log", |b| {
        b.iter(|| classify(black_box(Some(0)), black_box(&log)));
    });
}

fn bench_render_report(c: &mut Criterion) {
    let results = sample_results(200);
    let ctx = ReportContext {
        title: "igraphhpp regression test",
        generated_at: "Sat, 17 Oct 2026 12:00:00 (+00:00)",
        revision: Some("At revision 231."),
        environment: "linux x86_64",
        compilers: &COMPILERS,
        report_dir: Path::new("/work"),
    };

    c.bench_function("render_report_200_files", |b| {
        b.iter(|| render_report(black_box(&ctx), black_box(&results)));
    });
}

criterion_group!(benches, bench_classify, bench_render_report);
criterion_main!(benches);
