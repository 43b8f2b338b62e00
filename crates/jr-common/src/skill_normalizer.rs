use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use strsim::damerau_levenshtein;
use unicode_normalization::UnicodeNormalization;

/// Skill alias → canonical form mapping (O(1) lookup).
///
/// Aliases cover the spellings the EN/FR job boards actually emit; spoken
/// languages are deliberately absent (they live in `cv::LANGUAGES`).
static ALIAS_TO_CANONICAL: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let aliases: &[(&str, &[&str])] = &[
        // Languages
        ("python", &["python", "python3", "python 3", "py"]),
        ("java", &["java", "java8", "java11", "java17", "openjdk"]),
        (
            "javascript",
            &["javascript", "js", "java script", "ecmascript", "es6", "es2015"],
        ),
        ("typescript", &["typescript", "ts", "type script"]),
        ("golang", &["golang", "go", "go lang"]),
        ("rust", &["rust", "rust lang", "rust language"]),
        ("csharp", &["c#", "c sharp", "csharp", ".net", "dotnet"]),
        ("cplusplus", &["c++", "cpp", "c plus plus"]),
        ("php", &["php", "php7", "php8"]),
        ("ruby", &["ruby", "ruby on rails"]),
        ("swift", &["swift", "ios swift"]),
        ("kotlin", &["kotlin"]),
        ("scala", &["scala"]),
        ("sql", &["sql", "t-sql", "pl/sql"]),
        // Frontend
        ("react", &["react", "reactjs", "react.js", "react js", "react18"]),
        ("vue", &["vue", "vuejs", "vue.js", "vue js", "vue3"]),
        ("angular", &["angular", "angularjs", "angular.js", "angular2"]),
        ("svelte", &["svelte", "sveltejs", "svelte.js"]),
        ("nextjs", &["nextjs", "next.js", "next js"]),
        ("css", &["css", "css3"]),
        ("sass", &["sass", "scss"]),
        ("tailwind", &["tailwind", "tailwindcss", "tailwind css"]),
        // Backend frameworks
        ("nodejs", &["nodejs", "node.js", "node js", "node"]),
        ("django", &["django", "django rest framework", "drf"]),
        ("flask", &["flask", "python flask"]),
        ("fastapi", &["fastapi", "fast api"]),
        ("spring", &["spring", "spring boot", "springboot", "spring framework"]),
        ("rails", &["rails", "ror"]),
        ("laravel", &["laravel", "php laravel"]),
        ("symfony", &["symfony", "php symfony"]),
        ("express", &["express", "express.js", "expressjs"]),
        ("graphql", &["graphql", "graph ql"]),
        // Databases & streaming
        ("postgresql", &["postgresql", "postgres", "pg", "postgre sql"]),
        ("mysql", &["mysql", "my sql", "mariadb"]),
        ("mongodb", &["mongodb", "mongo", "mongo db"]),
        ("redis", &["redis", "redis cache"]),
        ("elasticsearch", &["elasticsearch", "elastic search"]),
        ("sqlite", &["sqlite", "sqlite3"]),
        ("kafka", &["kafka", "apache kafka"]),
        ("rabbitmq", &["rabbitmq", "rabbit mq"]),
        // Cloud & DevOps
        ("aws", &["aws", "amazon web services", "amazon aws"]),
        ("gcp", &["gcp", "google cloud platform", "google cloud"]),
        ("azure", &["azure", "microsoft azure", "ms azure"]),
        ("docker", &["docker", "docker compose"]),
        ("kubernetes", &["kubernetes", "k8s", "kube"]),
        ("terraform", &["terraform", "infrastructure as code", "iac"]),
        ("ansible", &["ansible"]),
        ("jenkins", &["jenkins", "jenkins ci"]),
        ("gitlab", &["gitlab", "gitlab ci"]),
        ("git", &["git", "github"]),
        ("linux", &["linux", "gnu/linux"]),
        // Data & ML
        (
            "ml",
            &["ml", "machine learning", "apprentissage automatique", "ai"],
        ),
        ("deeplearning", &["deeplearning", "deep learning"]),
        ("nlp", &["nlp", "natural language processing"]),
        ("tensorflow", &["tensorflow", "tensor flow", "tf"]),
        ("pytorch", &["pytorch", "py torch", "torch"]),
        ("pandas", &["pandas", "python pandas"]),
        ("numpy", &["numpy", "numerical python"]),
        ("spark", &["spark", "apache spark", "pyspark"]),
        ("airflow", &["airflow", "apache airflow"]),
    ];

    let mut map = HashMap::new();
    for (canonical, alias_list) in aliases {
        map.insert(*canonical, *canonical);
        for alias in *alias_list {
            map.insert(*alias, *canonical);
        }
    }
    map
});

/// Compact keys tolerate separator/punctuation drift ("Next.JS" → "nextjs").
static COMPACT_ALIAS_TO_CANONICAL: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (alias, canonical) in ALIAS_TO_CANONICAL.iter() {
        map.entry(compact_key(alias)).or_insert(*canonical);
    }
    map
});

/// Aliases that are ordinary words in free prose ("go", "express", "spring",
/// "ai"); they only count when they appear in an explicit skill field.
const AMBIGUOUS_IN_PROSE: &[&str] = &["go", "express", "spring", "ai", "node", "torch"];

fn nfkc_lower_trim(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}

fn compact_key(input: &str) -> String {
    input
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '_' | '/' | ','))
        .collect()
}

fn split_segments(input: &str) -> impl Iterator<Item = String> + '_ {
    input
        .split(|c: char| matches!(c, ' ' | '/' | ',' | ';' | '|' | '+'))
        .map(nfkc_lower_trim)
        .filter(|s| !s.is_empty())
}

fn fuzzy_match_canonical(compact: &str) -> Option<String> {
    if compact.len() < 5 {
        return None;
    }

    let mut best: Option<(&str, usize)> = None;
    for (alias, canonical) in COMPACT_ALIAS_TO_CANONICAL.iter() {
        // Short aliases and short canonical targets are matched only via the
        // exact lookups above; fuzzing them overmatches brief inputs.
        if alias.len() < 5 || canonical.len() < 5 {
            continue;
        }

        let distance = damerau_levenshtein(compact, alias);
        if distance == 0 {
            return Some((*canonical).to_string());
        }

        let len = compact.len().max(alias.len());
        let acceptable = distance == 1 || (len >= 8 && distance == 2);
        if !acceptable {
            continue;
        }

        match best {
            None => best = Some((*canonical, distance)),
            Some((_, best_dist)) if distance < best_dist => best = Some((*canonical, distance)),
            _ => {}
        }
    }

    best.map(|(canonical, _)| canonical.to_string())
}

fn match_canonical_token(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }

    if let Some(canonical) = ALIAS_TO_CANONICAL.get(token) {
        return Some((*canonical).to_string());
    }

    let compact = compact_key(token);
    if let Some(canonical) = COMPACT_ALIAS_TO_CANONICAL.get(&compact) {
        return Some((*canonical).to_string());
    }

    fuzzy_match_canonical(&compact)
}

/// Normalize one skill string from an explicit skill field to its canonical
/// form. Unknown skills fold to lowercase rather than being discarded.
pub fn normalize_skill(skill: &str) -> String {
    let normalized = nfkc_lower_trim(skill);
    if let Some(canonical) = match_canonical_token(&normalized) {
        return canonical;
    }

    for segment in split_segments(skill) {
        if let Some(canonical) = match_canonical_token(&segment) {
            return canonical;
        }
    }

    normalized
}

/// Normalize a skill list into a canonical `HashSet`.
pub fn normalize_skill_set(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| normalize_skill(s))
        .collect()
}

/// Normalize a skill list into a sorted, deduplicated `Vec` for storage.
pub fn normalize_skills_vec(skills: &[String]) -> Vec<String> {
    let mut result: Vec<String> = skills
        .iter()
        .map(|s| normalize_skill(s))
        .filter(|s| s.len() >= 2)
        .collect();
    result.sort();
    result.dedup();
    result
}

/// Vocabulary lookup for free-running text (CV bodies, posting
/// descriptions): exact and compact lookups only — no fuzzy matching, and
/// prose-ambiguous aliases are rejected. `None` means "not a known skill".
pub fn lookup_in_prose(token: &str) -> Option<&'static str> {
    let normalized = nfkc_lower_trim(token);
    if normalized.is_empty() || AMBIGUOUS_IN_PROSE.contains(&normalized.as_str()) {
        return None;
    }

    if let Some(canonical) = ALIAS_TO_CANONICAL.get(normalized.as_str()) {
        return Some(canonical);
    }
    COMPACT_ALIAS_TO_CANONICAL
        .get(&compact_key(&normalized))
        .copied()
}
