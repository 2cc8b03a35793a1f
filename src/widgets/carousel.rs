//! Carousel - Circular slide navigation
//!
//! One integer register (`current`) over a fixed ring of `.carousel__slide`
//! elements, driven by five input channels:
//!
//! - `.carousel__prev` / `.carousel__next` clicks
//! - dot clicks (one `.carousel__dot` per slide, rebuilt inside `.carousel__dots`)
//! - `ArrowLeft` / `ArrowRight` while focus is inside the container
//! - horizontal touch swipes
//! - autoplay, paused while the pointer is over the container
//!
//! Out-of-range indices wrap by a single step: anything below zero becomes
//! the last slide and anything past the end becomes the first.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use crate::config::CarouselOptions;
use crate::dom::arrays::{attributes, classes};
use crate::dom::query::{query_all_by_class, query_by_class};
use crate::dom::{
    children, dispatch_custom, element, is_allocated, on_destroy, pop_parent_context,
    push_parent_context, release_index, ElementProps,
};
use crate::error::WidgetError;
use crate::state::keyboard;
use crate::state::motion::MotionContext;
use crate::state::pointer::{self, PointerEvent, PointerHandler, PointerHandlers};
use crate::state::timers::{self, TimerId};
use crate::types::{aria_bool, Cleanup};

pub const SLIDE_CLASS: &str = "carousel__slide";
pub const SLIDE_ACTIVE_CLASS: &str = "carousel__slide--active";
pub const DOT_CLASS: &str = "carousel__dot";
pub const DOT_ACTIVE_CLASS: &str = "carousel__dot--active";
pub const DOTS_CLASS: &str = "carousel__dots";
pub const PREV_CLASS: &str = "carousel__prev";
pub const NEXT_CLASS: &str = "carousel__next";
pub const TRACK_CLASS: &str = "carousel__track";

/// Custom event dispatched on the container after navigation. Detail: new index.
pub const CHANGE_EVENT: &str = "carousel:change";

// =============================================================================
// STATE MACHINE
// =============================================================================

/// Current slide over a ring of `len` slides. `len` is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CarouselState {
    current: usize,
    len: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselAction {
    GoTo(isize),
    Next,
    Prev,
}

/// Single-step wrap: `index < 0` is the last slide, `index >= len` the first.
///
/// `normalize(-2, 5) == 4` and `normalize(10, 5) == 0`.
pub fn normalize(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(1)
    } else if index as usize >= len {
        0
    } else {
        index as usize
    }
}

/// Horizontal swipe: `diff = start_x - end_x`. Travel beyond `threshold`
/// to the left advances, to the right goes back; anything shorter is a tap.
pub fn swipe_action(start_x: f32, end_x: f32, threshold: f32) -> Option<CarouselAction> {
    let diff = start_x - end_x;
    if diff.abs() <= threshold {
        return None;
    }
    Some(if diff > 0.0 { CarouselAction::Next } else { CarouselAction::Prev })
}

impl CarouselState {
    /// First slide of `len` (clamped to at least one).
    pub fn new(len: usize) -> Self {
        Self { current: 0, len: len.max(1) }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn transition(&self, action: CarouselAction) -> Self {
        let current = self.current as isize;
        let target = match action {
            CarouselAction::GoTo(index) => index,
            CarouselAction::Next => current + 1,
            CarouselAction::Prev => current - 1,
        };
        Self {
            current: normalize(target, self.len),
            len: self.len,
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

struct CarouselInner {
    container: usize,
    slides: Vec<usize>,
    dots: Vec<usize>,
    state: Signal<CarouselState>,
    options: CarouselOptions,
    motion: MotionContext,
    autoplay: Cell<Option<TimerId>>,
    /// Gesture buffer, cleared after each swipe evaluation.
    touch_start_x: Cell<Option<f32>>,
    cleanups: RefCell<Vec<Cleanup>>,
    destroyed: Cell<bool>,
}

/// Controller for one `.carousel` container.
pub struct Carousel {
    inner: Rc<CarouselInner>,
}

impl Carousel {
    /// Discover slides, build dots, attach every input channel and show
    /// slide 0.
    pub fn init(
        container: usize,
        options: CarouselOptions,
        motion: MotionContext,
    ) -> Result<Self, WidgetError> {
        if !is_allocated(container) {
            tracing::warn!(container, "carousel container not found");
            return Err(WidgetError::missing("carousel container"));
        }

        let slides = query_all_by_class(container, SLIDE_CLASS);
        if slides.is_empty() {
            tracing::warn!(container, "carousel has no slides");
            return Err(WidgetError::NoSlides { container });
        }

        attributes::set_attribute_if_absent(container, "role", "region");
        attributes::set_attribute_if_absent(container, "aria-roledescription", "carousel");

        let dots = match query_by_class(container, DOTS_CLASS) {
            Some(dots_container) => build_dots(dots_container, slides.len()),
            None => query_all_by_class(container, DOT_CLASS),
        };

        if let Some(track) = query_by_class(container, TRACK_CLASS) {
            motion.promote_layer(track);
        }

        let inner = Rc::new(CarouselInner {
            container,
            state: signal(CarouselState::new(slides.len())),
            slides,
            dots,
            options,
            motion,
            autoplay: Cell::new(None),
            touch_start_x: Cell::new(None),
            cleanups: RefCell::new(Vec::new()),
            destroyed: Cell::new(false),
        });

        inner.render();

        // Removing the container from the document ends autoplay
        let weak = Rc::downgrade(&inner);
        on_destroy(container, move || {
            if let Some(inner) = weak.upgrade() {
                inner.destroyed.set(true);
                inner.stop_autoplay();
            }
        });

        let carousel = Self { inner };
        carousel.attach_listeners();
        if carousel.inner.options.autoplay {
            carousel.inner.start_autoplay();
        }

        tracing::debug!(container, slides = carousel.inner.slides.len(), "carousel mounted");
        Ok(carousel)
    }

    fn attach_listeners(&self) {
        let inner = &self.inner;
        let mut cleanups: Vec<Cleanup> = Vec::new();

        let navigate = |action: CarouselAction| -> PointerHandler {
            let weak = Rc::downgrade(inner);
            Rc::new(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.apply(action);
                }
            })
        };

        for (class, action) in [(PREV_CLASS, CarouselAction::Prev), (NEXT_CLASS, CarouselAction::Next)] {
            match query_by_class(inner.container, class) {
                Some(button) => cleanups.push(Box::new(pointer::on_element(button, PointerHandlers {
                    on_click: Some(navigate(action)),
                    ..Default::default()
                }))),
                None => tracing::debug!(container = inner.container, class, "carousel control absent"),
            }
        }

        for (i, &dot) in inner.dots.iter().enumerate() {
            cleanups.push(Box::new(pointer::on_element(dot, PointerHandlers {
                on_click: Some(navigate(CarouselAction::GoTo(i as isize))),
                ..Default::default()
            })));
        }

        let weak = Rc::downgrade(inner);
        cleanups.push(Box::new(keyboard::on_element(inner.container, move |event| {
            let action = match event.key.as_str() {
                "ArrowLeft" => CarouselAction::Prev,
                "ArrowRight" => CarouselAction::Next,
                _ => return false,
            };
            weak.upgrade().is_some_and(|inner| {
                inner.apply(action);
                true
            })
        })));

        cleanups.push(Box::new(pointer::on_element(inner.container, PointerHandlers {
            on_touch_start: Some(with_inner(inner, |inner, event| inner.touch_start_x.set(Some(event.x)))),
            on_touch_end: Some(with_inner(inner, |inner, event| inner.touch_end(event.x))),
            on_enter: Some(with_inner(inner, |inner, _| inner.stop_autoplay())),
            on_leave: Some(with_inner(inner, |inner, _| {
                if inner.options.autoplay {
                    inner.start_autoplay();
                }
            })),
            ..Default::default()
        })));

        inner.cleanups.borrow_mut().extend(cleanups);
    }

    /// Show slide `index` (single-step wrap).
    pub fn go_to_slide(&self, index: isize) {
        self.inner.apply(CarouselAction::GoTo(index));
    }

    pub fn next_slide(&self) {
        self.inner.apply(CarouselAction::Next);
    }

    pub fn prev_slide(&self) {
        self.inner.apply(CarouselAction::Prev);
    }

    pub fn current(&self) -> usize {
        self.inner.state.get().current()
    }

    pub fn state(&self) -> CarouselState {
        self.inner.state.get()
    }

    /// The state register, for reactive readers.
    pub fn state_signal(&self) -> Signal<CarouselState> {
        self.inner.state.clone()
    }

    pub fn slides(&self) -> &[usize] {
        &self.inner.slides
    }

    pub fn dots(&self) -> &[usize] {
        &self.inner.dots
    }

    pub fn is_autoplaying(&self) -> bool {
        self.inner.autoplay.get().is_some()
    }

    /// Start autoplay (no-op under reduced motion or when already running).
    pub fn play(&self) {
        self.inner.start_autoplay();
    }

    pub fn pause(&self) {
        self.inner.stop_autoplay();
    }

    /// Stop autoplay and detach every listener.
    pub fn destroy(self) {
        self.inner.destroyed.set(true);
        self.inner.stop_autoplay();
        let cleanups = std::mem::take(&mut *self.inner.cleanups.borrow_mut());
        for cleanup in cleanups {
            cleanup();
        }
        tracing::debug!(container = self.inner.container, "carousel destroyed");
    }
}

/// Pointer handler that forwards to a live controller.
fn with_inner<F>(inner: &Rc<CarouselInner>, f: F) -> PointerHandler
where
    F: Fn(&Rc<CarouselInner>, &PointerEvent) + 'static,
{
    let weak: Weak<CarouselInner> = Rc::downgrade(inner);
    Rc::new(move |event| {
        if let Some(inner) = weak.upgrade() {
            f(&inner, event);
        }
    })
}

/// Replace the dots container's children with one dot button per slide.
fn build_dots(dots_container: usize, count: usize) -> Vec<usize> {
    for old in children(dots_container) {
        release_index(old);
    }

    push_parent_context(dots_container);
    let dots = (0..count)
        .map(|i| {
            element(
                ElementProps::new("button")
                    .class(DOT_CLASS)
                    .attr("type", "button")
                    .attr("aria-label", &format!("Go to slide {}", i + 1)),
            )
        })
        .collect();
    pop_parent_context();
    dots
}

impl CarouselInner {
    fn apply(&self, action: CarouselAction) {
        let previous = self.state.get();
        let next = previous.transition(action);
        tracing::debug!(container = self.container, ?action, current = next.current(), "carousel transition");
        self.state.set(next);
        self.render();
        if next.current() != previous.current() {
            dispatch_custom(self.container, CHANGE_EVENT, &next.current().to_string());
        }
    }

    fn render(&self) {
        let current = self.state.get().current();
        for (i, &slide) in self.slides.iter().enumerate() {
            let active = i == current;
            classes::toggle_class(slide, SLIDE_ACTIVE_CLASS, active);
            attributes::set_attribute(slide, "aria-hidden", aria_bool(!active));
        }
        for (i, &dot) in self.dots.iter().enumerate() {
            let active = i == current;
            classes::toggle_class(dot, DOT_ACTIVE_CLASS, active);
            attributes::set_attribute(dot, "aria-current", aria_bool(active));
        }
    }

    fn touch_end(&self, end_x: f32) {
        let Some(start_x) = self.touch_start_x.take() else {
            tracing::debug!(container = self.container, "touch end without touch start");
            return;
        };
        if let Some(action) = swipe_action(start_x, end_x, self.options.swipe_threshold) {
            self.apply(action);
        }
    }

    fn start_autoplay(self: &Rc<Self>) {
        if self.destroyed.get() || self.autoplay.get().is_some() {
            return;
        }
        if self.motion.prefers_reduced_motion() {
            tracing::debug!(container = self.container, "reduced motion: autoplay disabled");
            return;
        }

        let weak = Rc::downgrade(self);
        let timer = timers::set_interval(self.options.interval(), move || {
            if let Some(inner) = weak.upgrade() {
                inner.apply(CarouselAction::Next);
            }
        });
        self.autoplay.set(timer);
    }

    fn stop_autoplay(&self) {
        if let Some(id) = self.autoplay.take() {
            timers::clear_interval(id);
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{body, on_custom, reset_document};
    use crate::state::focus;
    use crate::state::keyboard::KeyboardEvent;
    use crate::state::timers::{advance, reset_timers};
    use std::time::Duration;

    struct Fixture {
        container: usize,
        slides: Vec<usize>,
        prev: usize,
        next: usize,
        dots: usize,
        track: usize,
    }

    /// `.carousel` with `n` slides in a track, a dots container holding one
    /// stale dot, and prev/next buttons.
    fn setup(n: usize) -> Fixture {
        reset_document();
        reset_timers();
        push_parent_context(body());
        let mut slides = Vec::new();
        let (mut prev, mut next, mut dots, mut track) = (0, 0, 0, 0);
        let container = element(ElementProps::new("div").class("carousel").children(|| {
            track = element(ElementProps::new("div").class(TRACK_CLASS).children(|| {
                for i in 0..n {
                    slides.push(element(
                        ElementProps::new("div").class(SLIDE_CLASS).text(&format!("Slide {}", i + 1)),
                    ));
                }
            }));
            prev = element(ElementProps::new("button").class(PREV_CLASS));
            next = element(ElementProps::new("button").class(NEXT_CLASS));
            dots = element(ElementProps::new("div").class(DOTS_CLASS).children(|| {
                element(ElementProps::new("span").class("stale"));
            }));
        }));
        pop_parent_context();
        Fixture { container, slides, prev, next, dots, track }
    }

    fn mount(fixture: &Fixture) -> Carousel {
        Carousel::init(fixture.container, CarouselOptions::default(), MotionContext::default()).unwrap()
    }

    fn autoplay_options() -> CarouselOptions {
        CarouselOptions {
            autoplay: true,
            interval_ms: 1000,
            ..CarouselOptions::default()
        }
    }

    /// Exactly one active slide and one active dot, both at `current`.
    fn assert_single_active(carousel: &Carousel) {
        let current = carousel.current();
        assert!(current < carousel.slides().len());

        let active: Vec<usize> = (0..carousel.slides().len())
            .filter(|&i| classes::has_class(carousel.slides()[i], SLIDE_ACTIVE_CLASS))
            .collect();
        assert_eq!(active, vec![current]);

        let active_dots: Vec<usize> = (0..carousel.dots().len())
            .filter(|&i| classes::has_class(carousel.dots()[i], DOT_ACTIVE_CLASS))
            .collect();
        assert_eq!(active_dots, vec![current]);

        for (i, &slide) in carousel.slides().iter().enumerate() {
            let expected = if i == current { "false" } else { "true" };
            assert_eq!(attributes::get_attribute(slide, "aria-hidden").as_deref(), Some(expected));
        }
        for (i, &dot) in carousel.dots().iter().enumerate() {
            let expected = if i == current { "true" } else { "false" };
            assert_eq!(attributes::get_attribute(dot, "aria-current").as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_normalize_single_step() {
        assert_eq!(normalize(-1, 5), 4);
        assert_eq!(normalize(-2, 5), 4);
        assert_eq!(normalize(5, 5), 0);
        assert_eq!(normalize(10, 5), 0);
        assert_eq!(normalize(3, 5), 3);
    }

    #[test]
    fn test_full_cycle_identity() {
        for len in 1..=6 {
            for start in 0..len {
                let initial = CarouselState::new(len).transition(CarouselAction::GoTo(start as isize));
                let mut state = initial;
                for _ in 0..len {
                    state = state.transition(CarouselAction::Next);
                }
                assert_eq!(state, initial);
            }
        }
    }

    #[test]
    fn test_swipe_threshold() {
        assert_eq!(swipe_action(200.0, 150.0, 50.0), None);
        assert_eq!(swipe_action(150.0, 200.0, 50.0), None);
        assert_eq!(swipe_action(200.0, 149.0, 50.0), Some(CarouselAction::Next));
        assert_eq!(swipe_action(100.0, 151.0, 50.0), Some(CarouselAction::Prev));
        assert_eq!(swipe_action(10.0, 10.0, 50.0), None);
    }

    #[test]
    fn test_init_renders_first_slide_and_rebuilds_dots() {
        let fixture = setup(3);
        let carousel = mount(&fixture);

        assert_eq!(carousel.current(), 0);
        assert_eq!(carousel.dots().len(), 3);
        assert_eq!(children(fixture.dots), carousel.dots().to_vec());
        assert!(classes::has_class(fixture.track, "gpu-layer"));
        assert_single_active(&carousel);
    }

    #[test]
    fn test_prev_slide_scenario_five_slides() {
        let fixture = setup(5);
        let carousel = mount(&fixture);

        carousel.prev_slide();
        assert_eq!(carousel.current(), 4);
        assert!(classes::has_class(fixture.slides[4], SLIDE_ACTIVE_CLASS));
        assert!(classes::has_class(carousel.dots()[4], DOT_ACTIVE_CLASS));
        assert_single_active(&carousel);
    }

    #[test]
    fn test_go_to_slide_wraps() {
        let fixture = setup(5);
        let carousel = mount(&fixture);

        carousel.go_to_slide(-1);
        assert_eq!(carousel.current(), 4);
        carousel.go_to_slide(5);
        assert_eq!(carousel.current(), 0);
        carousel.go_to_slide(-2);
        assert_eq!(carousel.current(), 4);
        carousel.go_to_slide(10);
        assert_eq!(carousel.current(), 0);
        carousel.go_to_slide(2);
        assert_eq!(carousel.current(), 2);
        assert_single_active(&carousel);
    }

    #[test]
    fn test_buttons_dots_and_keys() {
        let fixture = setup(4);
        let carousel = mount(&fixture);

        pointer::dispatch(PointerEvent::click(fixture.next));
        assert_eq!(carousel.current(), 1);
        pointer::dispatch(PointerEvent::click(fixture.prev));
        pointer::dispatch(PointerEvent::click(fixture.prev));
        assert_eq!(carousel.current(), 3);

        pointer::dispatch(PointerEvent::click(carousel.dots()[2]));
        assert_eq!(carousel.current(), 2);

        // The dot click focused the dot, which sits inside the container
        assert!(keyboard::dispatch(KeyboardEvent::new("ArrowRight")));
        assert_eq!(carousel.current(), 3);
        assert!(keyboard::dispatch(KeyboardEvent::new("ArrowRight")));
        assert_eq!(carousel.current(), 0);
        assert!(keyboard::dispatch(KeyboardEvent::new("ArrowLeft")));
        assert_eq!(carousel.current(), 3);
        assert!(!keyboard::dispatch(KeyboardEvent::new("ArrowUp")));
        assert_single_active(&carousel);

        focus::blur();
        assert!(!keyboard::dispatch(KeyboardEvent::new("ArrowRight")));
        assert_eq!(carousel.current(), 3);
    }

    #[test]
    fn test_swipe_gestures() {
        let fixture = setup(3);
        let carousel = mount(&fixture);
        let slide = fixture.slides[0];

        // Below threshold: no change
        pointer::dispatch(PointerEvent::touch_start(slide, 300.0));
        pointer::dispatch(PointerEvent::touch_end(slide, 250.0));
        assert_eq!(carousel.current(), 0);

        // Swipe left: next
        pointer::dispatch(PointerEvent::touch_start(slide, 300.0));
        pointer::dispatch(PointerEvent::touch_end(slide, 200.0));
        assert_eq!(carousel.current(), 1);

        // Swipe right: prev
        pointer::dispatch(PointerEvent::touch_start(slide, 100.0));
        pointer::dispatch(PointerEvent::touch_end(slide, 220.0));
        assert_eq!(carousel.current(), 0);

        // Buffer was reset: a lone touch end is ignored
        pointer::dispatch(PointerEvent::touch_end(slide, 0.0));
        assert_eq!(carousel.current(), 0);
    }

    #[test]
    fn test_autoplay_pause_and_resume() {
        let fixture = setup(3);
        let carousel =
            Carousel::init(fixture.container, autoplay_options(), MotionContext::default()).unwrap();
        assert!(carousel.is_autoplaying());

        advance(Duration::from_millis(1000));
        assert_eq!(carousel.current(), 1);
        advance(Duration::from_millis(2000));
        assert_eq!(carousel.current(), 0);

        // Pointer over a slide pauses
        pointer::hover(Some(fixture.slides[1]));
        assert!(!carousel.is_autoplaying());
        advance(Duration::from_millis(5000));
        assert_eq!(carousel.current(), 0);

        // Leaving resumes
        pointer::hover(None);
        assert!(carousel.is_autoplaying());
        advance(Duration::from_millis(1000));
        assert_eq!(carousel.current(), 1);
        assert_single_active(&carousel);
    }

    #[test]
    fn test_reduced_motion_disables_autoplay() {
        let fixture = setup(3);
        let carousel =
            Carousel::init(fixture.container, autoplay_options(), MotionContext::new(true)).unwrap();

        assert!(!carousel.is_autoplaying());
        carousel.play();
        assert!(!carousel.is_autoplaying());
        advance(Duration::from_millis(10_000));
        assert_eq!(carousel.current(), 0);
        assert!(!classes::has_class(fixture.track, "gpu-layer"));
    }

    #[test]
    fn test_destroy_stops_everything() {
        let fixture = setup(3);
        let carousel =
            Carousel::init(fixture.container, autoplay_options(), MotionContext::default()).unwrap();
        let state = carousel.state_signal();

        carousel.destroy();
        assert_eq!(timers::active_count(), 0);

        advance(Duration::from_millis(5000));
        pointer::dispatch(PointerEvent::click(fixture.next));
        pointer::hover(Some(fixture.container));
        pointer::hover(None);
        assert_eq!(state.get().current(), 0);
        assert_eq!(timers::active_count(), 0);
    }

    #[test]
    fn test_change_event() {
        let fixture = setup(3);
        let carousel = mount(&fixture);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _cleanup = on_custom(body(), CHANGE_EVENT, move |event| {
            seen_clone.borrow_mut().push(event.detail.clone());
        });

        carousel.next_slide();
        carousel.prev_slide();
        carousel.prev_slide();
        assert_eq!(*seen.borrow(), vec!["1", "0", "2"]);
    }

    #[test]
    fn test_change_event_only_on_movement() {
        let fixture = setup(3);
        let carousel = mount(&fixture);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _cleanup = on_custom(fixture.container, CHANGE_EVENT, move |event| {
            seen_clone.borrow_mut().push(event.detail.clone());
        });

        carousel.go_to_slide(0);
        carousel.go_to_slide(2);
        carousel.go_to_slide(2);
        assert_eq!(*seen.borrow(), vec!["2"]);

        // A single slide never moves
        reset_document();
        push_parent_context(body());
        let single = element(ElementProps::new("div").children(|| {
            element(ElementProps::new("div").class(SLIDE_CLASS));
        }));
        pop_parent_context();
        let lonely = Carousel::init(single, CarouselOptions::default(), MotionContext::default()).unwrap();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let _cleanup = on_custom(single, CHANGE_EVENT, move |_| count_clone.set(count_clone.get() + 1));
        lonely.next_slide();
        lonely.prev_slide();
        assert_eq!(lonely.current(), 0);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_space_on_next_button() {
        let fixture = setup(3);
        let carousel = mount(&fixture);

        focus::focus(fixture.next);
        keyboard::dispatch(KeyboardEvent::new(" "));
        assert_eq!(carousel.current(), 1);
        keyboard::dispatch(KeyboardEvent::new("Enter"));
        assert_eq!(carousel.current(), 2);

        focus::focus(carousel.dots()[0]);
        keyboard::dispatch(KeyboardEvent::new("Enter"));
        assert_eq!(carousel.current(), 0);
    }

    #[test]
    fn test_released_container_stops_autoplay() {
        let fixture = setup(3);
        let carousel =
            Carousel::init(fixture.container, autoplay_options(), MotionContext::default()).unwrap();
        assert_eq!(timers::active_count(), 1);

        release_index(fixture.container);
        assert_eq!(timers::active_count(), 0);
        assert!(!carousel.is_autoplaying());

        carousel.play();
        assert_eq!(timers::active_count(), 0);
    }

    #[test]
    fn test_existing_dots_without_container() {
        reset_document();
        push_parent_context(body());
        let mut dots = Vec::new();
        let container = element(ElementProps::new("div").children(|| {
            element(ElementProps::new("div").class(SLIDE_CLASS));
            element(ElementProps::new("div").class(SLIDE_CLASS));
            dots.push(element(ElementProps::new("button").class(DOT_CLASS)));
            dots.push(element(ElementProps::new("button").class(DOT_CLASS)));
        }));
        pop_parent_context();

        let carousel =
            Carousel::init(container, CarouselOptions::default(), MotionContext::default()).unwrap();
        assert_eq!(carousel.dots(), dots.as_slice());
        carousel.next_slide();
        assert_single_active(&carousel);
    }

    #[test]
    fn test_missing_targets() {
        reset_document();
        let empty = element(ElementProps::new("div").class("carousel"));
        assert_eq!(
            Carousel::init(empty, CarouselOptions::default(), MotionContext::default()).err(),
            Some(WidgetError::NoSlides { container: empty })
        );
        assert_eq!(
            Carousel::init(99, CarouselOptions::default(), MotionContext::default()).err(),
            Some(WidgetError::missing("carousel container"))
        );
    }

    #[test]
    fn test_random_walk_keeps_single_active() {
        let fixture = setup(4);
        let carousel = mount(&fixture);

        let steps: [isize; 12] = [1, -1, -1, 7, 2, -3, 1, 1, 1, 1, 4, -1];
        for step in steps {
            match step {
                1 => carousel.next_slide(),
                -1 => carousel.prev_slide(),
                other => carousel.go_to_slide(other),
            }
            assert_single_active(&carousel);
        }
    }
}
