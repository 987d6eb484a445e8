use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Oblique,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum FontWeight {
    Thin,
    UltraLight,
    Light,
    SemiLight,
    Book,
    #[default]
    Normal,
    Medium,
    SemiBold,
    Bold,
    UltraBold,
    Heavy,
    UltraHeavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum FontStretch {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    #[default]
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontSize {
    Points(f32),
    Pixels(f32),
}

/// Structured form of a font string such as `"DejaVu Sans Mono Bold 11"`.
///
/// The grammar is `[FAMILY-LIST] [STYLE-OPTIONS] [SIZE]`: a comma separated
/// family list, any number of style words, and an optional trailing size
/// (`px` suffix for absolute sizes).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontDescription {
    pub families: Vec<String>,
    pub style: FontStyle,
    pub weight: FontWeight,
    pub stretch: FontStretch,
    pub size: Option<FontSize>,
}

enum StyleWord {
    Style(FontStyle),
    Weight(FontWeight),
    Stretch(FontStretch),
    Plain,
}

impl FontDescription {
    /// Parse a font string; unknown words become part of the family name.
    pub fn parse(text: &str) -> Self {
        let mut words: Vec<&str> = text.split_whitespace().collect();
        let mut description = FontDescription::default();

        if let Some(size) = words.last().and_then(|word| parse_size(word)) {
            description.size = Some(size);
            words.pop();
        }

        while let Some(word) = words.last() {
            match style_word(word) {
                Some(StyleWord::Style(style)) => description.style = style,
                Some(StyleWord::Weight(weight)) => description.weight = weight,
                Some(StyleWord::Stretch(stretch)) => {
                    description.stretch = stretch
                },
                Some(StyleWord::Plain) => {},
                None => break,
            }
            words.pop();
        }

        description.families = words
            .join(" ")
            .split(',')
            .map(str::trim)
            .filter(|family| !family.is_empty())
            .map(ToString::to_string)
            .collect();

        description
    }

    pub fn family(&self) -> Option<&str> {
        self.families.first().map(String::as_str)
    }
}

impl fmt::Display for FontDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.families.is_empty() {
            parts.push(self.families.join(","));
        }
        if let Some(word) = stretch_name(self.stretch) {
            parts.push(word.to_string());
        }
        if let Some(word) = weight_name(self.weight) {
            parts.push(word.to_string());
        }
        if let Some(word) = style_name(self.style) {
            parts.push(word.to_string());
        }
        match self.size {
            Some(FontSize::Points(points)) => parts.push(format!("{points}")),
            Some(FontSize::Pixels(pixels)) => parts.push(format!("{pixels}px")),
            None => {},
        }
        if parts.is_empty() {
            return f.write_str("Normal");
        }
        f.write_str(&parts.join(" "))
    }
}

fn parse_size(word: &str) -> Option<FontSize> {
    let (number, pixels) = match word.strip_suffix("px") {
        Some(number) => (number, true),
        None => (word, false),
    };
    let value = number.parse::<f32>().ok()?;
    if !value.is_finite() || value <= 0.0 {
        return None;
    }
    Some(if pixels {
        FontSize::Pixels(value)
    } else {
        FontSize::Points(value)
    })
}

fn style_word(word: &str) -> Option<StyleWord> {
    let lowered = word.to_ascii_lowercase();
    let parsed = match lowered.as_str() {
        "normal" | "regular" | "roman" => StyleWord::Plain,
        "oblique" => StyleWord::Style(FontStyle::Oblique),
        "italic" => StyleWord::Style(FontStyle::Italic),
        "thin" => StyleWord::Weight(FontWeight::Thin),
        "ultra-light" | "ultralight" | "extra-light" | "extralight" => {
            StyleWord::Weight(FontWeight::UltraLight)
        },
        "light" => StyleWord::Weight(FontWeight::Light),
        "semi-light" | "semilight" | "demi-light" | "demilight" => {
            StyleWord::Weight(FontWeight::SemiLight)
        },
        "book" => StyleWord::Weight(FontWeight::Book),
        "medium" => StyleWord::Weight(FontWeight::Medium),
        "semi-bold" | "semibold" | "demi-bold" | "demibold" => {
            StyleWord::Weight(FontWeight::SemiBold)
        },
        "bold" => StyleWord::Weight(FontWeight::Bold),
        "ultra-bold" | "ultrabold" | "extra-bold" | "extrabold" => {
            StyleWord::Weight(FontWeight::UltraBold)
        },
        "heavy" | "black" => StyleWord::Weight(FontWeight::Heavy),
        "ultra-heavy" | "ultraheavy" | "extra-heavy" | "extraheavy"
        | "ultra-black" | "ultrablack" | "extra-black" | "extrablack" => {
            StyleWord::Weight(FontWeight::UltraHeavy)
        },
        "ultra-condensed" => StyleWord::Stretch(FontStretch::UltraCondensed),
        "extra-condensed" => StyleWord::Stretch(FontStretch::ExtraCondensed),
        "condensed" => StyleWord::Stretch(FontStretch::Condensed),
        "semi-condensed" => StyleWord::Stretch(FontStretch::SemiCondensed),
        "semi-expanded" => StyleWord::Stretch(FontStretch::SemiExpanded),
        "expanded" => StyleWord::Stretch(FontStretch::Expanded),
        "extra-expanded" => StyleWord::Stretch(FontStretch::ExtraExpanded),
        "ultra-expanded" => StyleWord::Stretch(FontStretch::UltraExpanded),
        _ => return None,
    };
    Some(parsed)
}

fn style_name(style: FontStyle) -> Option<&'static str> {
    match style {
        FontStyle::Normal => None,
        FontStyle::Oblique => Some("Oblique"),
        FontStyle::Italic => Some("Italic"),
    }
}

fn weight_name(weight: FontWeight) -> Option<&'static str> {
    match weight {
        FontWeight::Normal => None,
        FontWeight::Thin => Some("Thin"),
        FontWeight::UltraLight => Some("Ultra-Light"),
        FontWeight::Light => Some("Light"),
        FontWeight::SemiLight => Some("Semi-Light"),
        FontWeight::Book => Some("Book"),
        FontWeight::Medium => Some("Medium"),
        FontWeight::SemiBold => Some("Semi-Bold"),
        FontWeight::Bold => Some("Bold"),
        FontWeight::UltraBold => Some("Ultra-Bold"),
        FontWeight::Heavy => Some("Heavy"),
        FontWeight::UltraHeavy => Some("Ultra-Heavy"),
    }
}

fn stretch_name(stretch: FontStretch) -> Option<&'static str> {
    match stretch {
        FontStretch::Normal => None,
        FontStretch::UltraCondensed => Some("Ultra-Condensed"),
        FontStretch::ExtraCondensed => Some("Extra-Condensed"),
        FontStretch::Condensed => Some("Condensed"),
        FontStretch::SemiCondensed => Some("Semi-Condensed"),
        FontStretch::SemiExpanded => Some("Semi-Expanded"),
        FontStretch::Expanded => Some("Expanded"),
        FontStretch::ExtraExpanded => Some("Extra-Expanded"),
        FontStretch::UltraExpanded => Some("Ultra-Expanded"),
    }
}
