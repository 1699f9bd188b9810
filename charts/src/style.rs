use std::collections::BTreeMap;

use plotters::style::{Palette, Palette99, RGBColor};
use shared::Program;

#[derive(Debug, Clone)]
pub struct SeriesStyle {
    pub label: String,
    pub color: RGBColor,
}

/// Everything cosmetic the renderer needs, passed explicitly to every chart.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub size: (u32, u32),
    pub font: String,
    pub caption_size: u32,
    pub label_size: u32,
    pub programs: BTreeMap<Program, SeriesStyle>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        let programs = [
            (Program::Serial, "Serial", RGBColor(0x2E, 0x86, 0xAB)),
            (Program::Race, "Race Condition", RGBColor(0xA2, 0x3B, 0x72)),
            (Program::BusyWait, "Busy-Wait (inefficient)", RGBColor(0xF1, 0x8F, 0x01)),
            (Program::BusyWaitCs, "Busy-Wait (efficient)", RGBColor(0xC7, 0x3E, 0x1D)),
            (Program::Mutex, "Mutex", RGBColor(0x6A, 0x99, 0x4E)),
        ]
        .into_iter()
        .map(|(program, label, color)| {
            let label = label.to_owned();
            (program, SeriesStyle { label, color })
        })
        .collect();

        Self {
            size: (1200, 800),
            font: "sans-serif".to_owned(),
            caption_size: 28,
            label_size: 16,
            programs,
        }
    }
}

impl ChartStyle {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn label(&self, program: Program) -> String {
        self.programs
            .get(&program)
            .map_or_else(|| program.short_name().to_owned(), |s| s.label.clone())
    }

    pub fn color(&self, program: Program) -> RGBColor {
        self.programs.get(&program).map_or_else(
            || {
                let index = Program::ALL.iter().position(|&p| p == program).unwrap_or(0);
                let (r, g, b) = Palette99::COLORS[index % Palette99::COLORS.len()];
                RGBColor(r, g, b)
            },
            |s| s.color,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_program_has_a_style() {
        let style = ChartStyle::default();
        for program in Program::ALL {
            assert!(style.programs.contains_key(&program));
        }
        assert_eq!(style.label(Program::Mutex), "Mutex");
        assert_eq!(style.color(Program::Serial), RGBColor(0x2E, 0x86, 0xAB));
    }

    #[test]
    fn falls_back_for_unstyled_programs() {
        let mut style = ChartStyle::default().with_size(640, 480);
        style.programs.clear();
        assert_eq!(style.size, (640, 480));
        assert_eq!(style.label(Program::Race), "race");
        let _ = style.color(Program::Race);
    }
}
