use criterion::{Criterion, black_box, criterion_group, criterion_main};
use jsmin::{MemoryStream, Minifier};

// A commented, generously indented block typical of unminified sources.
const SAMPLE: &str = r#"
// Compute the n-th Fibonacci number iteratively.
function fib(n) {
    if (n <= 1) {
        return n;
    }
    var a = 0;  /* F(0) */
    var b = 1;  /* F(1) */
    for (var i = 2; i <= n; i = i + 1) {
        var c = a + b;
        a = b;
        b = c;
    }
    return b;
}

var pattern = /[a-z]+\/[0-9]*/;
var banner = "  //  spacing preserved inside strings  ";
var total = 0;
for (var i = 0; i < 100; i = i + 1) {
    total = total + fib(i % 30);
}
"#;

fn bench_minify_small(c: &mut Criterion) {
    c.bench_function("minify small", |b| {
        b.iter(|| {
            let mut input = MemoryStream::reader(SAMPLE.as_bytes());
            let mut output = MemoryStream::writer(SAMPLE.len());
            Minifier::new(&mut input, &mut output).minify().unwrap();
            black_box(output.into_bytes())
        })
    });
}

fn bench_minify_64k(c: &mut Criterion) {
    let mut source = String::new();
    while source.len() < 64 * 1024 {
        source.push_str(SAMPLE);
    }

    c.bench_function("minify 64k", |b| {
        b.iter(|| {
            let mut input = MemoryStream::reader(source.as_bytes());
            let mut output = MemoryStream::writer(source.len());
            Minifier::new(&mut input, &mut output).minify().unwrap();
            black_box(output.into_bytes())
        })
    });
}

criterion_group!(benches, bench_minify_small, bench_minify_64k);
criterion_main!(benches);
