//! Part naming conventions of a PresentationML package.

pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const THEME_PREFIX: &str = "ppt/theme/";

/// `<dir>/_rels/<name>.rels` for a part; the package root uses `_rels/.rels`.
pub fn relationships_part_for(owner: &str) -> String {
    let owner = owner.trim_start_matches('/');
    match owner.rsplit_once('/') {
        Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
        None => format!("_rels/{}.rels", owner),
    }
}

/// Trailing number of a part named `...<stem><N>.xml`.
pub fn part_number(path: &str, stem: &str) -> Option<u32> {
    let name = path.rsplit('/').next()?;
    let digits = name.strip_prefix(stem)?.strip_suffix(".xml")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

pub fn slide_number(path: &str) -> Option<u32> {
    part_number(path, "slide")
}

/// Exactly `ppt/slides/slide<N>.xml`; slide rels and layouts do not match.
pub fn is_slide_part(path: &str) -> bool {
    path.strip_prefix(SLIDE_PREFIX)
        .and_then(|rest| rest.strip_suffix(".xml"))
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

pub fn is_theme_part(path: &str) -> bool {
    path.strip_prefix(THEME_PREFIX)
        .is_some_and(|rest| !rest.contains('/') && rest.ends_with(".xml"))
}

/// Resolve a relationship target against the directory of its owning part.
///
/// `..` segments walk up from the owner's directory, so
/// `../slideLayouts/slideLayout1.xml` owned by `ppt/slides/slide1.xml`
/// becomes `ppt/slideLayouts/slideLayout1.xml`. Absolute targets are taken
/// from the package root.
pub fn resolve_target(owner: &str, target: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    let relative = match target.strip_prefix('/') {
        Some(absolute) => absolute,
        None => {
            if let Some((dir, _)) = owner.trim_start_matches('/').rsplit_once('/') {
                segments.extend(dir.split('/').filter(|s| !s.is_empty()));
            }
            target
        }
    };

    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}
