//! English rule tables: special cases, affix patterns, infixes and the
//! whole-token matchers.
//!
//! Special cases only record the surface pieces a chunk splits into. The
//! key of every entry is the concatenation of its pieces, so a special
//! case can never drop or invent characters.

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

/// Chunk text -> the tokens it is split into.
pub type SpecialCases = FxHashMap<String, Vec<String>>;

pub const ALPHA_LOWER: &str = "a-z";
pub const ALPHA_UPPER: &str = "A-Z";
pub const ALPHA: &str = "a-zA-Z";
pub const DIGITS: &str = "0-9";
pub const ALPHANUM: &str = "a-zA-Z0-9";
pub const QUOTES: &str = r#"'"`‘’“”„»«「」『』（）〔〕【】《》〈〉⟦⟧"#;

pub const CURRENCY: &str = r"\$|£|€|¥|฿|US\$|C\$|A\$|₽|﷼|₴|₠|₡|₢|₣|₤|₥|₦|₧|₨|₩|₪|₫|₭|₮|₯|₰|₱|₲|₳|₵|₶|₷|₸|₹|₺|₻|₼|₾|₿";
pub const UNITS: &str = "km|km²|km³|m|m²|m³|dm|dm²|dm³|cm|cm²|cm³|mm|mm²|mm³|ha|µm|nm|yd|in|ft|kg|g|mg|µg|t|lb|oz|m/s|km/h|kmh|mph|hPa|Pa|mbar|mb|MB|kb|KB|gb|GB|tb|TB|T|G|M|K|%";

pub const HYPHENS: &[&str] = &["-", "–", "—", "~"];
pub const MULTI_HYPHENS: &str = r"--|---|——";
pub const ELLIPSIS_CHARS: &[&str] = &["…", "⋯", "⋮"];
pub const ELLIPSIS_PATTERNS: &[&str] = &[r"\.{3,}", r"\.{2}"];
pub const ICONS: &[&str] = &[r"[❤⭐👍✔✘]", r"[😊😂😍🤔😅]"];

pub static EMOTICONS: &[&str] = &[
    ":)", ":-)", ":))", ":-))", ":)))", ":-)))", "(:", "(-:", "=)", "(=", ":]", ":-]", "[:", "[-:", "[=", "=]",
    ":o)", "(o:", ":}", ":-}", "8)", "8-)", "(-8", ";)", ";-)", "(;", "(-;", ":(", ":-(", ":((", ":-((", ":(((",
    ":-(((", "):", ")-:", "=(", ">:(", ":')", ":'-)", ":'(", ":'-(", ":/", ":-/", "=/", "=|", ":|", ":-|", "]=",
    "=[", ":1", ":P", ":-P", ":p", ":-p", ":O", ":-O", ":o", ":-o", ":0", ":-0", ":()", ">:o", ":*", ":-*", ":3",
    ":-3", "=3", ":>", ":->", ":X", ":-X", ":x", ":-x", ":D", ":-D", ";D", ";-D", "=D", "xD", "XD", "xDD", "XDD",
    "8D", "8-D", "^_^", "^__^", "^___^", ">.<", ">.>", "<.<", "._.", ";_;", "-_-", "-__-", "v.v", "V.V", "v_v",
    "V_V", "o_o", "o_O", "O_o", "O_O", "0_o", "o_0", "0_0", "o.O", "O.o", "O.O", "o.o", "0.0", "o.0", "0.o",
    "@_@", "<3", "<33", "<333", "</3", "(^_^)", "(-_-)", "(._.)", "(>_<)", "(*_*)", "(¬_¬)", "ಠ_ಠ", "ಠ︵ಠ",
    "(ಠ_ಠ)", "¯\\(ツ)/¯", "(╯°□°）╯︵┻━┻", "><(((*>",
];

/// Abbreviations kept whole, both as special cases and as suffixes.
pub static ABBREVIATIONS: &[&str] = &[
    "'d", "a.m.", "Adm.", "Bros.", "co.", "Co.", "Corp.", "D.C.", "Dr.", "e.g.", "E.g.", "E.G.", "etc.", "Gen.",
    "Gov.", "i.e.", "I.e.", "I.E.", "Inc.", "Jr.", "Ltd.", "Md.", "Messrs.", "Mo.", "Mont.", "Mr.", "Mrs.", "Ms.",
    "p.m.", "Ph.D.", "Prof.", "Rep.", "Rev.", "Sen.", "Sr.", "St.", "vs.", "v.s.", "viz.", "U.S.", "U.K.", "N.Y.",
    "L.A.", "Dec.", "approx.",
];

static REGION_AND_MONTH_ABBREVIATIONS: &[&str] = &[
    "Mt.", "Ak.", "Ala.", "Apr.", "Ariz.", "Ark.", "Aug.", "Calif.", "Colo.", "Conn.", "Del.", "Feb.", "Fla.",
    "Ga.", "Ia.", "Id.", "Ill.", "Ind.", "Jan.", "Jul.", "Jun.", "Kan.", "Kans.", "Ky.", "La.", "Mar.", "Mass.",
    "Mich.", "Minn.", "Miss.", "N.C.", "N.D.", "N.H.", "N.J.", "N.M.", "Neb.", "Nebr.", "Nev.", "Nov.", "Oct.",
    "Okla.", "Ore.", "Pa.", "S.C.", "Sep.", "Sept.", "Tenn.", "Va.", "Wash.", "Wis.",
];

static SINGLE_TOKENS: &[&str] = &[
    "'S", "'s", "\u{2018}S", "\u{2018}s", "and/or", "w/o", "'re", "'Cause", "'cause", "'cos", "'Cos", "'coz",
    "'Coz", "'cuz", "'Cuz", "'bout", "ma'am", "Ma'am", "o'clock", "O'clock",
];

/// Contraction-shaped words that are far more often ordinary words.
static NOT_SPECIAL: &[&str] = &[
    "Ill", "ill", "Its", "its", "Hell", "hell", "Shell", "shell", "Shed", "shed", "were", "Were", "Well", "well",
    "Whore", "whore",
];

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

#[derive(Default)]
struct Builder {
    cases: SpecialCases,
}

impl Builder {
    fn split(&mut self, pieces: &[&str]) {
        self.cases
            .insert(pieces.concat(), pieces.iter().map(|p| p.to_string()).collect());
    }

    fn whole(&mut self, token: &str) {
        self.split(&[token]);
    }

    /// Adds `head + tail` for both the lowercase and capitalized head.
    fn cased(&mut self, head: &str, tail: &[&str]) {
        for head in [head.to_string(), capitalize(head)] {
            let mut pieces = Vec::with_capacity(tail.len() + 1);
            pieces.push(head.as_str());
            pieces.extend_from_slice(tail);
            self.split(&pieces);
        }
    }
}

pub fn special_cases() -> SpecialCases {
    let mut b = Builder::default();

    b.cased("i", &["'m"]);
    b.cased("i", &["m"]);
    b.cased("i", &["'m", "a"]);
    b.cased("i", &["m", "a"]);

    const WILL_WOULD: &[&[&str]] = &[
        &["'ll"], &["ll"], &["'ll", "'ve"], &["ll", "ve"], &["'d"], &["d"], &["'d", "'ve"], &["d", "ve"],
    ];
    for pron in ["i", "you", "he", "she", "it", "we", "they"] {
        for tail in WILL_WOULD {
            b.cased(pron, tail);
        }
    }
    for pron in ["i", "you", "we", "they"] {
        b.cased(pron, &["'ve"]);
        b.cased(pron, &["ve"]);
    }
    for pron in ["you", "we", "they"] {
        b.cased(pron, &["'re"]);
        b.cased(pron, &["re"]);
    }
    for pron in ["he", "she", "it"] {
        b.cased(pron, &["'s"]);
        b.cased(pron, &["s"]);
    }

    // (word, takes 's, takes 're/'ve)
    let w_words = [
        ("who", true, true), ("what", true, true), ("when", true, true), ("where", true, true),
        ("why", true, true), ("how", true, true), ("there", true, true), ("that", true, false),
        ("this", true, false), ("these", false, true), ("those", false, true),
    ];
    for (word, singular, plural) in w_words {
        if singular {
            b.cased(word, &["'s"]);
            b.cased(word, &["s"]);
        }
        if plural {
            for tail in [&["'re"][..], &["re"], &["'ve"], &["ve"]] {
                b.cased(word, tail);
            }
        }
        for tail in WILL_WOULD {
            b.cased(word, tail);
        }
    }

    for verb in [
        "ca", "could", "do", "does", "did", "had", "may", "might", "must", "need", "ought", "sha", "should", "wo",
        "would",
    ] {
        for tail in [&["n't"][..], &["nt"], &["n't", "'ve"], &["nt", "ve"]] {
            b.cased(verb, tail);
        }
    }
    for verb in ["could", "might", "must", "should", "would"] {
        b.cased(verb, &["'ve"]);
        b.cased(verb, &["ve"]);
    }
    for verb in ["ai", "are", "is", "was", "were", "have", "has", "dare"] {
        b.cased(verb, &["n't"]);
        b.cased(verb, &["nt"]);
    }

    for word in ["doin", "goin", "nothin", "nuthin", "ol", "somethin", "lovin", "havin"] {
        b.cased(word, &[]);
        b.cased(&format!("{}'", word), &[]);
    }
    for word in ["em", "ll", "nuff"] {
        b.whole(word);
        b.whole(&format!("'{}", word));
    }

    for hour in 1..=12 {
        let hour = hour.to_string();
        for period in ["a.m.", "am", "p.m.", "pm"] {
            b.split(&[hour.as_str(), period]);
        }
    }

    b.split(&["y'", "all"]);
    b.split(&["y", "all"]);
    b.cased("how", &["'d", "'y"]);
    b.cased("not", &["'ve"]);
    b.cased("not", &["ve"]);
    b.cased("can", &["not"]);
    b.cased("gon", &["na"]);
    b.cased("got", &["ta"]);
    b.cased("let", &["'s"]);
    b.cased("c'm", &["on"]);

    for token in SINGLE_TOKENS
        .iter()
        .chain(REGION_AND_MONTH_ABBREVIATIONS)
        .chain(ABBREVIATIONS)
        .chain(EMOTICONS)
    {
        b.whole(token);
    }

    for word in NOT_SPECIAL {
        b.cases.remove(*word);
    }
    b.cases
}

fn alternation(items: &[&str], escape: fn(&str) -> String) -> String {
    let mut sorted = items.to_vec();
    sorted.sort_by_key(|s| std::cmp::Reverse(s.len()));
    let escaped: Vec<String> = sorted.into_iter().map(escape).collect();
    format!("(?:{})", escaped.join("|"))
}

fn fancy_escape(s: &str) -> String {
    fancy_regex::escape(s).into_owned()
}

fn plain_escape(s: &str) -> String {
    regex::escape(s)
}

fn quotes_class() -> String {
    QUOTES.replace('[', r"\[").replace(']', r"\]").replace('-', r"\-")
}

static EMOTICON_SUFFIX: Lazy<String> = Lazy::new(|| alternation(EMOTICONS, fancy_escape));

/// Patterns split off the start of a chunk.
pub fn prefixes() -> Vec<String> {
    let mut patterns: Vec<String> = [
        "§", "%", "=", "—", "–", r"\+(?![0-9])", r"\(", r"\[", r"\{", "<", "\"", "'", "`", "“", "‘", "‚", "„",
        "«", "»", "「", "」", "『", "』", "（", "〔", "【", "《", "〈", "⟦", "#", "&",
    ]
    .iter()
    .map(|p| p.to_string())
    .collect();
    patterns.push(format!("(?:{})", CURRENCY));
    patterns.extend(["¢", "֏", "؋", "៛"].iter().map(|p| p.to_string()));
    patterns
}

/// Patterns split off the end of a chunk, tried in order.
pub fn suffixes() -> Vec<String> {
    let mut patterns = vec![EMOTICON_SUFFIX.clone()];
    patterns.extend(ELLIPSIS_PATTERNS.iter().map(|p| p.to_string()));
    patterns.extend(ELLIPSIS_CHARS.iter().map(|p| fancy_escape(p)));
    patterns.extend(ABBREVIATIONS.iter().map(|p| fancy_escape(p)));
    patterns.extend(
        [
            ":", ";", "!", r"\?", r"\.", ",", r"\)", r"\]", r"\}", ">", "\"", "'", "`", "”", "’", "‚", "„", "»",
            "«", "」", "「", "』", "『", "）", "〕", "】", "》", "〉", "⟧", "'s", "'S", "’s", "’S", "—", "–",
            r"(?<=[0-9])\+", r"(?<=°[FfCcKk])\.", r"(?<=[A-Z][A-Z])\.",
        ]
        .iter()
        .map(|p| p.to_string()),
    );
    patterns.push(format!(r"(?<=[0-9])(?:{})", CURRENCY));
    patterns.push(format!(r"(?<=[0-9])(?:{})", UNITS));
    patterns.push(format!(r"(?<=[{}%²\-+{}])\.", ALPHANUM, quotes_class()));
    patterns
}

/// Infixes that are plain strings, matched with Aho-Corasick. Longest first.
pub fn infix_literals() -> Vec<String> {
    let ambiguous: FxHashSet<&str> = ["o.o", "0.0", "._.", ":0", ":1", ":3"].into_iter().collect();
    let mut literals: Vec<String> = EMOTICONS
        .iter()
        .filter(|e| !ambiguous.contains(*e))
        .chain(["(", ")", "[", "]", "{", "}", "<", ">", ":", "/", "="].iter())
        .chain(HYPHENS)
        .chain(ELLIPSIS_CHARS)
        .map(|s| s.to_string())
        .collect();
    literals.sort_by_key(|s| std::cmp::Reverse(s.len()));
    let mut seen = FxHashSet::default();
    literals.retain(|s| seen.insert(s.clone()));
    literals
}

/// Infixes that need lookaround or repetition.
pub fn infix_patterns() -> Vec<String> {
    let mut patterns: Vec<String> = ELLIPSIS_PATTERNS.iter().map(|p| p.to_string()).collect();
    patterns.push(format!(r"(?<=[{d}])[+\-*^](?=[{d}-])", d = DIGITS));
    patterns.push(format!(
        r"(?<=[{lower}{q}])\.(?=[{upper}{q}])",
        lower = ALPHA_LOWER,
        upper = ALPHA_UPPER,
        q = quotes_class()
    ));
    patterns.push(format!(r"(?<=[{a}]),(?=[{a}])", a = ALPHA));
    patterns.push(MULTI_HYPHENS.to_string());
    patterns.push(format!(r"(?<=[{an}])[:<>=/](?=[{a}])", an = ALPHANUM, a = ALPHA));
    patterns.push(format!(r"(?<=[{a}])[:<>=/](?=[{an}])", an = ALPHANUM, a = ALPHA));
    patterns.extend(ICONS.iter().map(|p| p.to_string()));
    patterns
}

/// Chunks matching this whole are never split. Free of lookaround, so it
/// compiles with the linear-time `regex` engine.
pub fn token_match() -> String {
    let mut parts: Vec<String> = vec![
        format!(r"(?:{})[0-9]{{1,3}}(?:,[0-9]{{3}})*(?:\.[0-9]{{2}})?", CURRENCY),
        format!(r"(?:{})[0-9]+(?:\.[0-9]{{2}})?", CURRENCY),
        r"[+-]?\d{1,3}(?:,\d{3})*(?:\.\d+)?".to_string(),
        r"[+-]?\d+\.\d+".to_string(),
        r"[+-]?\.\d+".to_string(),
        r"[+-]?\d+".to_string(),
    ];
    parts.extend(ELLIPSIS_PATTERNS.iter().map(|p| p.to_string()));
    parts.extend(ELLIPSIS_CHARS.iter().map(|p| plain_escape(p)));
    parts.extend(
        ["[%]", "[°ºª]", "&(?:amp|lt|gt|quot|apos);", "[®©™℠]"]
            .iter()
            .map(|p| p.to_string()),
    );
    parts.extend(ABBREVIATIONS.iter().map(|p| plain_escape(p)));
    parts.push(alternation(EMOTICONS, plain_escape));
    parts.extend(ICONS.iter().map(|p| p.to_string()));
    format!(r"^(?:{})$", parts.join("|"))
}

const HOST_CHARS: &str = "A-Za-z0-9\u{a1}-\u{ffff}";

/// URLs and bare domains, matched against the whole chunk.
pub fn url_match() -> String {
    [
        r"^",
        r"(?:(?:[\w+\-.]{2,})://)?",
        r"(?:\S+(?::\S*)?@)?",
        r"(?:",
        r"(?!(?:10|127)(?:\.\d{1,3}){3})",
        r"(?!(?:169\.254|192\.168)(?:\.\d{1,3}){2})",
        r"(?!172\.(?:1[6-9]|2\d|3[0-1])(?:\.\d{1,3}){2})",
        r"(?:[1-9]\d?|1\d\d|2[01]\d|22[0-3])",
        r"(?:\.(?:1?\d{1,2}|2[0-4]\d|25[0-5])){2}",
        r"(?:\.(?:[1-9]\d?|1\d\d|2[0-4]\d|25[0-4]))",
        r"|",
        &format!(r"(?:(?:[{h}][{h}_-]{{0,62}})?[{h}]\.)+", h = HOST_CHARS),
        &format!(r"(?:[{}]{{2,63}})", ALPHA_LOWER),
        r")",
        r"(?::\d{2,5})?",
        r"(?:[/?#]\S*)?",
        r"$",
    ]
    .concat()
}
