use chatguard::core::message::{Classification, Message};
use chatguard::core::session::{apply_action, Session, SessionAction};
use chatguard::ui::renderer::{build_display_lines, wrapped_line_count};
use chatguard::ui::theme::Theme;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn make_session(n_pairs: usize, base: &str) -> Session {
    let mut history = Vec::with_capacity(n_pairs * 2);
    for i in 0..n_pairs {
        history.push(Message::user(base));
        let classification = match i % 3 {
            0 => Classification::Safe,
            1 => Classification::Offensive,
            _ => Classification::Irrelevant,
        };
        history.push(Message::bot(base, classification));
    }

    let mut session = Session::new();
    apply_action(
        &mut session,
        SessionAction::Initialize {
            mode: Default::default(),
            history,
            probe_health: false,
        },
    );
    session
}

fn bench_transcript_render(c: &mut Criterion) {
    let theme = Theme::dark_default();
    let base = "The quick brown fox jumps over the lazy dog. ".repeat(6);
    let mut group = c.benchmark_group("transcript_render");

    for &pairs in &[50_usize, 500, 2000] {
        let session = make_session(pairs, &base);
        group.throughput(Throughput::Elements((pairs * 2) as u64));
        group.bench_with_input(BenchmarkId::new("lines_and_wrap", pairs), &session, |b, s| {
            b.iter(|| {
                let lines = build_display_lines(s, &theme, None);
                wrapped_line_count(&lines, 100)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_transcript_render);
criterion_main!(benches);
