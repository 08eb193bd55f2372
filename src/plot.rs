use std::{ops::RangeInclusive, sync::Arc};

use egui_plot::{
    AxisHints, CoordinatesFormatter, Corner, GridInput, GridMark, Legend, Plot, PlotPoint,
};

/// Most slots a day can have.
const MAX_SLOTS: f64 = 24.0;

/// Label of the slot at `x`, nothing in between two slots.
fn slot_label(labels: &[String], x: f64) -> Option<&str> {
    if !(0.0..MAX_SLOTS).contains(&x) || x.fract() != 0.0 {
        return None;
    }
    labels.get(x as usize).map(String::as_str)
}

/// One mark per slot, every third one stronger.
fn slot_grid(input: GridInput) -> Vec<GridMark> {
    let (start, end) = input.bounds;
    let first = start.max(0.0).ceil();
    let last = end.min(MAX_SLOTS - 1.0).floor();
    if first.is_nan() || last.is_nan() || first > last {
        return Vec::new();
    }

    (first as u32..=last as u32)
        .map(|slot| GridMark {
            value: f64::from(slot),
            step_size: if slot % 3 == 0 { 3.0 } else { 1.0 },
        })
        .collect()
}

/// A plot with one x position per hourly slot, labelled with `labels`.
pub fn create_plot_hourly(
    name: &str,
    labels: Arc<[String]>,
    formatter: impl Fn(f64) -> String + 'static,
) -> Plot {
    let axis_labels = labels.clone();
    let slot_formatter = move |mark: GridMark, _max_chars: usize, _range: &RangeInclusive<f64>| {
        slot_label(&axis_labels, mark.value)
            .unwrap_or_default()
            .to_string()
    };

    let format_plot_point = Arc::new(move |point: &PlotPoint| {
        let slot = slot_label(&labels, point.x.round()).unwrap_or_default();
        format!("{slot}\n{}", formatter(point.y))
    });

    let fmt = format_plot_point.clone();

    Plot::new(name)
        .legend(Legend::default())
        .coordinates_formatter(
            Corner::LeftBottom,
            CoordinatesFormatter::new(move |point, _| fmt(point)),
        )
        .custom_x_axes(vec![AxisHints::new_x()
            .label("Time")
            .formatter(slot_formatter)])
        .x_grid_spacer(slot_grid)
        .label_formatter(move |_, point| format_plot_point(point))
        .allow_scroll(false)
}

#[cfg(test)]
mod test {
    use super::*;

    fn labels() -> Vec<String> {
        (20..24).map(|hour| format!("{hour:02}:00")).collect()
    }

    #[test]
    fn labels_only_on_slots() {
        let labels = labels();
        assert_eq!(slot_label(&labels, 0.0), Some("20:00"));
        assert_eq!(slot_label(&labels, 3.0), Some("23:00"));
        assert_eq!(slot_label(&labels, 4.0), None);
        assert_eq!(slot_label(&labels, 1.5), None);
        assert_eq!(slot_label(&labels, -1.0), None);
        assert_eq!(slot_label(&labels, f64::NAN), None);
    }

    #[test]
    fn grid_stays_within_the_day() {
        let marks = slot_grid(GridInput {
            bounds: (-2.3, 30.0),
            base_step_size: 0.1,
        });
        assert_eq!(marks.len(), 24);
        assert_eq!(marks[0].value, 0.0);
        assert_eq!(marks[0].step_size, 3.0);
        assert_eq!(marks[1].step_size, 1.0);
        assert_eq!(marks[23].value, 23.0);

        let marks = slot_grid(GridInput {
            bounds: (4.2, 4.8),
            base_step_size: 0.1,
        });
        assert!(marks.is_empty());
    }
}
