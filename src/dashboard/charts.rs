//! ECharts visualisations of the trailing-30-day spending on the dashboard.
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with a matching HTML container and initialisation script.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregation::CategoryTotals,
    category::Category,
    dashboard::chart_data::{BAR_CHART_CATEGORIES, DONUT_CHART_SLICES, totals_for},
    html::HeadElement,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Build the bar and donut charts from the user's totals per category.
pub(super) fn build_dashboard_charts(totals: &[(Category, CategoryTotals)]) -> [DashboardChart; 2] {
    [
        DashboardChart {
            id: "total-spent-chart",
            options: total_spent_chart(totals).to_string(),
        },
        DashboardChart {
            id: "expenditure-types-chart",
            options: expenditure_types_chart(totals).to_string(),
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

fn total_spent_chart(totals: &[(Category, CategoryTotals)]) -> Chart {
    let labels: Vec<String> = BAR_CHART_CATEGORIES
        .iter()
        .map(|category| category.name().to_owned())
        .collect();
    let sums: Vec<f64> = BAR_CHART_CATEGORIES
        .iter()
        .map(|&category| totals_for(category, totals).total)
        .collect();
    let averages: Vec<f64> = BAR_CHART_CATEGORIES
        .iter()
        .map(|&category| totals_for(category, totals).average)
        .collect();

    Chart::new()
        .title(Title::new().text("Spending").subtext("Last 30 days"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(currency_formatter())
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().top("1%").right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(80)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Total Spent").data(sums))
        .series(Bar::new().name("Average").data(averages))
}

fn expenditure_types_chart(totals: &[(Category, CategoryTotals)]) -> Chart {
    let colors: Vec<Color> = DONUT_CHART_SLICES
        .iter()
        .map(|&(_, color, _)| Color::from(color))
        .collect();
    let data: Vec<(f64, &str)> = DONUT_CHART_SLICES
        .iter()
        .map(|&(category, _, _)| (totals_for(category, totals).total, category.name()))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by Category").subtext("Last 30 days"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .color(colors)
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"$0.00\";",
    )
}

#[cfg(test)]
mod tests {
    use crate::{aggregation::CategoryTotals, category::Category};

    use super::build_dashboard_charts;

    #[test]
    fn charts_have_distinct_ids() {
        let charts = build_dashboard_charts(&[]);

        assert_ne!(charts[0].id, charts[1].id);
    }

    #[test]
    fn bar_chart_lists_categories_in_display_order() {
        let totals = [(
            Category::Food,
            CategoryTotals {
                total: 42.5,
                average: 21.25,
                count: 2,
            },
        )];

        let [bar_chart, _] = build_dashboard_charts(&totals);

        let food = bar_chart.options.find("\"Food\"").unwrap();
        let groceries = bar_chart.options.find("\"Groceries\"").unwrap();
        let online = bar_chart.options.find("\"Online Purchase\"").unwrap();
        assert!(food < groceries && groceries < online);
        assert!(bar_chart.options.contains("42.5"));
        assert!(bar_chart.options.contains("21.25"));
    }

    #[test]
    fn donut_chart_uses_category_colours() {
        let [_, donut_chart] = build_dashboard_charts(&[]);

        assert!(donut_chart.options.contains("#F7464A"));
        assert!(donut_chart.options.contains("\"Travel\""));
    }
}
