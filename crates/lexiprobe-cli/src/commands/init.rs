//! The `lexiprobe init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create lexiprobe.toml
    if Path::new("lexiprobe.toml").exists() {
        println!("lexiprobe.toml already exists, skipping.");
    } else {
        std::fs::write("lexiprobe.toml", SAMPLE_CONFIG)?;
        println!("Created lexiprobe.toml");
    }

    // Create sample word lists
    std::fs::create_dir_all("words")?;
    for (name, content) in SAMPLE_WORD_LISTS {
        let path = Path::new("words").join(name);
        if path.exists() {
            println!("{} already exists, skipping.", path.display());
        } else {
            std::fs::write(&path, content)?;
            println!("Created {}", path.display());
        }
    }

    println!("\nNext steps:");
    println!("  1. Replace the sample lists in words/ with real tier lists");
    println!("  2. Run: lexiprobe validate");
    println!("  3. Run: lexiprobe level");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# lexiprobe configuration

# Fix the word order (also settable with LEXIPROBE_SEED).
# seed = 42

[leveler]
finding_sample_size = 24
refinement_sample_size = 48
lower_threshold = 6
upper_threshold = 17
inconclusive_fraction = 0.15

[[tiers]]
label = "basic"
min_words = 500
max_words = 3000
words = "words/tier1.txt"

[[tiers]]
label = "intermediate"
min_words = 3000
max_words = 18000
words = "words/tier2.txt"

[[tiers]]
label = "fluent"
min_words = 18000
max_words = 40000
words = "words/tier3.txt"

[[tiers]]
label = "proficient"
min_words = 40000
max_words = 80000
words = "words/tier4.txt"

[survey]
dictionary = "words/dictionary.txt"
total_words = 312368
margin = "precise"
"#;

const SAMPLE_WORD_LISTS: [(&str, &str); 5] = [
    (
        "tier1.txt",
        "# basic\ncasa\nágua\ncomer\nlivro\nporta\namigo\ncidade\nnoite\nfalar\nrua\ntrabalho\nescola\n",
    ),
    (
        "tier2.txt",
        "# intermediate\nalicerce\nbrevidade\ncobiça\ndesleixo\nenxurrada\nfagulha\ngrilhão\nímpeto\nlábia\nmarasmo\nnuance\nolvidar\n",
    ),
    (
        "tier3.txt",
        "# fluent\nacrimônia\nbalbúrdia\ncircunspecto\ndiatribe\nefêmero\nfalácia\ngárrulo\nhermético\ninefável\njactância\nlacônico\nmalogro\n",
    ),
    (
        "tier4.txt",
        "# proficient\nabscôndito\nbazófia\ncatilinária\ndefenestrar\nestultícia\nfescenino\ngrandiloquente\nhirsuto\nincúria\njeremiada\nlhaneza\nmoliçal\n",
    ),
    (
        "dictionary.txt",
        "casa\nágua\ncomer\nlivro\nporta\namigo\ncidade\nnoite\nfalar\nrua\nalicerce\nbrevidade\ncobiça\ndesleixo\nenxurrada\nacrimônia\nbalbúrdia\ncircunspecto\nabscôndito\nbazófia\n",
    ),
];
