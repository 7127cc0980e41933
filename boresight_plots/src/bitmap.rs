use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::{ChartLabels, PlotErrors, Plotter, Series, check_series, value_range};

const PLOT_WIDTH: u32 = 1000;
const PLOT_HEIGHT: u32 = 600;
const FONT_SIZE_TITLE: u32 = 24;
const FONT_SIZE_LABEL: u32 = 14;
const LINE_WIDTH: u32 = 2;
const PALETTE: [RGBColor; 3] = [RED, BLUE, GREEN];

/// Line chart saved as a PNG image.
#[derive(Clone, Debug)]
pub struct BitmapPlotter {
    path: PathBuf,
    size: (u32, u32),
    labels: ChartLabels,
}

impl BitmapPlotter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            size: (PLOT_WIDTH, PLOT_HEIGHT),
            labels: ChartLabels::default(),
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_labels(mut self, labels: ChartLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn drawing<E: std::fmt::Display>(e: E) -> PlotErrors {
    PlotErrors::Drawing(e.to_string())
}

impl Plotter for BitmapPlotter {
    fn render(&self, series: &[Series<'_>]) -> Result<(), PlotErrors> {
        let n = check_series(series)?;
        let x_max = (n.saturating_sub(1)).max(1) as f64;
        let (y_min, y_max) = value_range(series);

        let root = BitMapBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(drawing)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.labels.title, ("sans-serif", FONT_SIZE_TITLE))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..x_max, y_min..y_max)
            .map_err(drawing)?;

        chart
            .configure_mesh()
            .x_desc(&self.labels.x_label)
            .y_desc(&self.labels.y_label)
            .label_style(("sans-serif", FONT_SIZE_LABEL))
            .draw()
            .map_err(drawing)?;

        for (s, color) in series.iter().zip(PALETTE.iter().cycle()) {
            let color = *color;
            chart
                .draw_series(LineSeries::new(
                    s.values
                        .iter()
                        .enumerate()
                        .filter(|(_, v)| v.is_finite())
                        .map(|(i, v)| (i as f64, *v)),
                    color.stroke_width(LINE_WIDTH),
                ))
                .map_err(drawing)?
                .label(s.label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(drawing)?;

        root.present().map_err(drawing)?;
        tracing::info!("plot saved as '{}'", self.path.display());
        Ok(())
    }
}
