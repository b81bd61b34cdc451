// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_description(sections: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("## Chapter {}\n\n", section));
        content.push_str(
            "Explore a **hand-crafted** world with *dozens* of ~~bugs~~ secrets. \
             Visit [the wiki](https://innliv.com/wiki) for `tips`.\n\n",
        );
        for i in 0..4 {
            content.push_str(&format!("- Feature {} of chapter {}\n", i, section));
        }
        content.push('\n');
        content.push_str("> A quote from a happy player.\n\n");
    }

    content
}

#[allow(dead_code)]
pub fn generate_large_description() -> String {
    generate_description(200)
}
