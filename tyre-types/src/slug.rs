use crate::product::Product;

/// Lowercases `name` and collapses every run of characters outside `[a-z0-9]`
/// into a single `-`. Non-ASCII letters are treated as separators.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}

/// First product whose name slugifies to `slug`. Same-named products collide
/// and the earlier one wins.
pub fn resolve<'a>(products: &'a [Product], slug: &str) -> Option<(usize, &'a Product)> {
    products
        .iter()
        .enumerate()
        .find(|(_, p)| slugify(&p.name) == slug)
}

/// Uses `hint` as the catalog position when it points at a product with the
/// same slug, otherwise falls back to [`resolve`].
pub fn resolve_with_hint<'a>(
    products: &'a [Product],
    slug: &str,
    hint: Option<usize>,
) -> Option<(usize, &'a Product)> {
    hint.and_then(|i| products.get(i).map(|p| (i, p)))
        .filter(|(_, p)| slugify(&p.name) == slug)
        .or_else(|| resolve(products, slug))
}
