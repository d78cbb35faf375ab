use crate::Algorithm;

pub struct PlotFmt;

impl PlotFmt {
    pub fn label_name(algorithm: Algorithm) -> &'static str {
        match algorithm {
            Algorithm::MinAug => "min. augmentation",
            Algorithm::MaxProfit => "max. profit",
            Algorithm::WoViol => "rounding w/o augmentation",
            Algorithm::Mdk => "multi-dimensional knapsack",
            Algorithm::Baseline => "baseline",
        }
    }

    // math-mode text, to be wrapped in `$`
    pub fn math_label_name(algorithm: Algorithm) -> &'static str {
        match algorithm {
            Algorithm::MinAug => "\\mathrm{RR}_{\\mathrm{MinLoad}}",
            Algorithm::MaxProfit => "\\mathrm{RR}_{\\mathrm{MaxProfit}}",
            Algorithm::WoViol => "\\mathrm{RR}_{\\mathrm{Heuristic}}",
            Algorithm::Mdk => "\\mathrm{RR}_{\\mathrm{MDK}}",
            Algorithm::Baseline => "\\mathrm{MIP}_{\\mathrm{MCF}}",
        }
    }

    pub fn marker(algorithm: Algorithm) -> &'static str {
        match algorithm {
            Algorithm::MinAug => "o",
            Algorithm::MaxProfit => "v",
            Algorithm::WoViol => "x",
            Algorithm::Mdk => "+",
            Algorithm::Baseline => "^",
        }
    }

    pub fn color(algorithm: Algorithm) -> &'static str {
        match algorithm {
            Algorithm::MinAug => "salmon",
            Algorithm::MaxProfit => "darkred",
            Algorithm::WoViol => "g",
            Algorithm::Mdk => "b",
            Algorithm::Baseline => "k",
        }
    }

    // colors of the dual bound series, one per number of requests
    pub fn bound_color(index: usize) -> &'static str {
        let colors = ["k", "g", "b", "r"];
        colors[index % colors.len()]
    }

    // colors of the temporal percentile series
    pub fn percentile_color(index: usize) -> &'static str {
        let colors = ["k", "k", "k", "r", "g", "b", "c", "c", "b", "g", "r"];
        colors[index % colors.len()]
    }

    /// Bounding box `[[x_min, x_max], [y_min, y_max]]` of the scatter plot of
    /// relative profit against maximum load.
    pub fn scatter_bounding_box(algorithm: Algorithm) -> [[f64; 2]; 2] {
        match algorithm {
            Algorithm::MinAug => [[50.0, 140.0], [85.0, 275.0]],
            Algorithm::MaxProfit => [[90.0, 225.0], [30.0, 625.0]],
            Algorithm::WoViol => [[25.0, 105.0], [75.0, 105.0]],
            Algorithm::Mdk => [[25.0, 125.0], [50.0, 105.0]],
            Algorithm::Baseline => [[0.0, 100.0], [0.0, 100.0]],
        }
    }
}
