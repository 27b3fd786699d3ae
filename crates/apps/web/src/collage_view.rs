//! Puts revealed collage cards into the page.

use story::{CollageRevealer, RevealableImage, ViewportProfile};
use wasm_bindgen::JsValue;
use web_sys::Element;

use crate::dom;

pub const CONTAINER_ID: &str = "collage-images";
const EASING: &str = "cubic-bezier(0.25, 0.46, 0.45, 0.94)";

fn animation_name(index: usize) -> String {
    format!("card-throw-{index}")
}

/// Throw from the hand position along an arc, landing on the resting placement.
pub fn keyframes_css(index: usize, image: &RevealableImage) -> String {
    let p = &image.position;
    let t = &image.throw;
    format!(
        "@keyframes {name} {{\
         0% {{ left: {sx}%; top: {sy}%; transform: translate(-50%, -50%) rotate({sr}deg) scale(0.8); opacity: 0; }}\
         30% {{ opacity: 1; top: {arc}%; }}\
         100% {{ left: {left}%; top: {top}%; transform: translate(-50%, -50%) rotate({rot}deg) scale({scale}); opacity: 1; }}\
         }}",
        name = animation_name(index),
        sx = t.start_x,
        sy = t.start_y,
        sr = t.start_rotation,
        arc = t.start_y - t.arc_height,
        left = p.left,
        top = p.top,
        rot = p.rotation,
        scale = p.scale,
    )
}

pub fn card_style(index: usize, image: &RevealableImage, profile: ViewportProfile) -> String {
    let p = &image.position;
    let t = &image.throw;
    format!(
        "position: absolute; left: {left}%; top: {top}%; z-index: {z}; height: {h}px; \
         transform: translate(-50%, -50%) rotate({rot}deg) scale({scale}); \
         animation: {name} {dur}s {EASING} {delay}s both;",
        left = p.left,
        top = p.top,
        z = p.z_index,
        h = profile.pick(350, 220),
        rot = p.rotation,
        scale = p.scale,
        name = animation_name(index),
        dur = t.duration_s,
        delay = t.delay_s,
    )
}

fn card(index: usize, image: &RevealableImage, profile: ViewportProfile) -> Result<Element, JsValue> {
    let document = dom::document()?;
    let wrapper = document.create_element("div")?;
    wrapper.set_class_name("collage-card");
    wrapper.set_attribute("style", &card_style(index, image, profile))?;

    let keyframes = document.create_element("style")?;
    keyframes.set_text_content(Some(keyframes_css(index, image).as_str()));
    wrapper.append_child(&keyframes)?;

    let img = document.create_element("img")?;
    img.set_attribute("src", &image.src)?;
    img.set_attribute("alt", &format!("Collage piece {index}"))?;
    img.set_attribute("loading", "lazy")?;
    img.set_attribute("style", &format!("max-width: {}px;", profile.pick(1000, 300)))?;
    wrapper.append_child(&img)?;
    Ok(wrapper)
}

/// Appends one card per index; each card animates once on insertion.
pub fn reveal(revealer: &CollageRevealer, indices: &[usize], profile: ViewportProfile) -> Result<(), JsValue> {
    if indices.is_empty() {
        return Ok(());
    }
    let container = dom::document()?
        .get_element_by_id(CONTAINER_ID)
        .ok_or_else(|| JsValue::from_str("missing #collage-images"))?;
    for &index in indices {
        let Some(image) = revealer.images().get(index) else {
            continue;
        };
        let card = card(index, image, profile)?;
        container.append_child(&card)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{card_style, keyframes_css};
    use story::{CollageRevealer, ViewportProfile};

    #[test]
    fn keyframes_land_on_the_resting_placement() {
        let revealer = CollageRevealer::new(vec!["a.png".to_string()], 3);
        let image = &revealer.images()[0];
        let css = keyframes_css(0, image);
        assert!(css.starts_with("@keyframes card-throw-0 {"));
        assert!(css.contains(&format!("left: {}%; top: {}%;", image.position.left, image.position.top)));
        assert!(css.ends_with('}'));
    }

    #[test]
    fn cards_are_smaller_on_phones() {
        let revealer = CollageRevealer::new(vec!["a.png".to_string()], 3);
        let image = &revealer.images()[0];
        assert!(card_style(0, image, ViewportProfile::Mobile).contains("height: 220px;"));
        assert!(card_style(0, image, ViewportProfile::Desktop).contains("card-throw-0"));
    }
}
