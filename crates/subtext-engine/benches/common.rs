// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
use subtext_engine::InMemoryResolver;

#[allow(dead_code)]
pub fn generate_note(blocks: usize) -> String {
    let base = [
        "# Gardening notes",
        "Visit [[Ben Follington]] about the /guide-to-gardening-ideas and #compost",
        "Water *daily* with `drip` lines, see www.example.com or ben@example.com",
        "Plain paragraph without any entities in it at all, just words.",
        "Compare /my-favorite-beach with /counterintuitive-ideas and [[Seasons]]",
    ];
    (0..blocks)
        .map(|i| base[i % base.len()])
        .collect::<Vec<_>>()
        .join("\n")
}

#[allow(dead_code)]
pub fn generate_long_line(entities: usize) -> String {
    let mut line = String::new();
    for i in 0..entities {
        line.push_str(&format!("word [[Page {i}]] #tag{i} /note-{i} "));
    }
    line
}

#[allow(dead_code)]
pub fn resolver() -> InMemoryResolver {
    InMemoryResolver::new()
        .with("guide-to-gardening-ideas", "Water daily.")
        .with("my-favorite-beach", "Sand and sea.")
        .with("counterintuitive-ideas", "Less is more.")
}
