//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for spending data:
//! - **Monthly Spending**: Bar chart of the total spent each month
//! - **Spending by Category**: Pie chart of each category's share of spending
//! - **Category Spending**: Bar chart of the total spent per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.
//! Charts without any data are rendered as an empty-state message instead.

use std::collections::HashMap;

use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Label, Tooltip,
        Trigger,
    },
    series::{Pie, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    aggregation::{CategoryShare, CategoryTotal, MonthlyTotal},
    html::{CARD_STYLE, HeadElement},
};

/// The ECharts build loaded on pages with charts.
pub(super) const ECHARTS_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// The colours used for chart series, in order.
const CHART_COLORS: [&str; 6] = [
    "#6366F1", "#00C49F", "#FFBB28", "#FF8042", "#8884D8", "#0088FE",
];

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The heading shown above the chart
    pub title: &'static str,
    /// The ECharts configuration, `None` if there is no data to show
    pub options: Option<String>,
}

/// Builds the three dashboard charts from the aggregated data.
pub(super) fn build_dashboard_charts(
    monthly_totals: &[MonthlyTotal],
    category_shares: &[CategoryShare],
    category_totals: &[CategoryTotal],
) -> [DashboardChart; 3] {
    [
        DashboardChart {
            id: "monthly-spending-chart",
            title: "Monthly Spending",
            options: monthly_spending_chart(monthly_totals).map(|chart| chart.to_string()),
        },
        DashboardChart {
            id: "category-pie-chart",
            title: "Spending by Category",
            options: category_pie_chart(category_shares).map(|chart| chart.to_string()),
        },
        DashboardChart {
            id: "category-spending-chart",
            title: "Category Spending",
            options: category_spending_chart(category_totals).map(|chart| chart.to_string()),
        },
    ]
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full space-y-8"
        {
            @for chart in charts {
                div class=(CARD_STYLE)
                {
                    h2 class="text-xl font-semibold mb-4" { (chart.title) }

                    @if chart.options.is_some() {
                        div
                            id=(chart.id)
                            class="min-h-[320px] rounded"
                        {}
                    } @else {
                        div
                            id=(chart.id)
                            data-empty="true"
                            class="flex items-center justify-center h-40
                                text-gray-500 dark:text-gray-400"
                        {
                            "No data to display yet"
                        }
                    }
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing. Charts without data are skipped.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .filter_map(|chart| chart.options.as_ref().map(|options| (chart.id, options)))
        .map(|(id, options)| {
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
                id,
                escape_script_text(options)
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

/// Escapes `<` so text from transactions cannot close the inline script.
///
/// `<` only ever appears inside string literals of the chart options, where
/// `\u003c` reads back as the same character.
fn escape_script_text(text: &str) -> String {
    text.replace('<', "\\u003c")
}

pub(super) fn monthly_spending_chart(monthly_totals: &[MonthlyTotal]) -> Option<Chart> {
    if monthly_totals.is_empty() {
        return None;
    }

    let labels: Vec<String> = monthly_totals
        .iter()
        .map(|total| total.label.clone())
        .collect();
    let values: Vec<f64> = monthly_totals.iter().map(|total| total.total).collect();

    Some(
        base_chart()
            .tooltip(currency_tooltip())
            .x_axis(Axis::new().type_(AxisType::Category).data(labels))
            .y_axis(
                Axis::new()
                    .type_(AxisType::Value)
                    .axis_label(AxisLabel::new().formatter(currency_formatter())),
            )
            .series(bar::Bar::new().name("Expenses").data(values)),
    )
}

pub(super) fn category_pie_chart(category_shares: &[CategoryShare]) -> Option<Chart> {
    if category_shares.is_empty() {
        return None;
    }

    // The labels show the rounded percentages computed on the server, not the
    // ones ECharts would compute itself.
    let percentages: HashMap<&str, f64> = category_shares
        .iter()
        .map(|share| (share.category.as_str(), share.percentage))
        .collect();
    let percentages = serde_json::to_string(&percentages).unwrap_or_else(|_| "{}".to_owned());
    let data: Vec<(f64, &str)> = category_shares
        .iter()
        .map(|share| (share.total, share.category.as_str()))
        .collect();

    Some(
        Chart::new()
            .color(chart_colors())
            .tooltip(
                Tooltip::new()
                    .trigger(Trigger::Item)
                    .formatter(percentage_formatter(&percentages, true)),
            )
            .legend(Legend::new().bottom("0%"))
            .series(
                Pie::new()
                    .name("Spending by Category")
                    .label(
                        Label::new()
                            .show(true)
                            .formatter(percentage_formatter(&percentages, false)),
                    )
                    .data(data),
            ),
    )
}

pub(super) fn category_spending_chart(category_totals: &[CategoryTotal]) -> Option<Chart> {
    if category_totals.is_empty() {
        return None;
    }

    let labels: Vec<String> = category_totals
        .iter()
        .map(|total| total.category.clone())
        .collect();
    let values: Vec<f64> = category_totals.iter().map(|total| total.total).collect();

    Some(
        base_chart()
            .tooltip(currency_tooltip())
            .x_axis(Axis::new().type_(AxisType::Category).data(labels))
            .y_axis(
                Axis::new()
                    .type_(AxisType::Value)
                    .axis_label(AxisLabel::new().formatter(currency_formatter())),
            )
            .series(bar::Bar::new().name("Spent").data(values)),
    )
}

fn base_chart() -> Chart {
    Chart::new()
        .color(chart_colors())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
}

fn chart_colors() -> Vec<Color> {
    CHART_COLORS.iter().map(|&color| Color::from(color)).collect()
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-IN', {
              style: 'currency',
              currency: 'INR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Formats pie slices as "Category: 12.5%", optionally with the amount.
fn percentage_formatter(percentages_json: &str, with_amount: bool) -> JsFunction {
    let amount = if with_amount {
        "' (' + new Intl.NumberFormat('en-IN', { style: 'currency', currency: 'INR' }).format(params.value) + ')'"
    } else {
        "''"
    };

    JsFunction::new_with_args(
        "params",
        &format!(
            "const percentages = {percentages_json};
            const percentage = percentages[params.name] ?? 0;
            return params.name + ': ' + percentage.toFixed(1) + '%' + {amount};"
        ),
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{
        DashboardChart, build_dashboard_charts, category_pie_chart, charts_script, charts_view,
        escape_script_text, monthly_spending_chart,
    };
    use crate::{
        aggregation::{category_breakdown, category_totals, monthly_totals},
        html::HeadElement,
        transaction::Transaction,
    };

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            Transaction {
                id: 1,
                amount: 300.0,
                date: date!(2024 - 01 - 15),
                description: "Groceries".to_owned(),
                category: Some("Food".to_owned()),
            },
            Transaction {
                id: 2,
                amount: 100.0,
                date: date!(2024 - 02 - 03),
                description: "Train".to_owned(),
                category: Some("Transport".to_owned()),
            },
        ]
    }

    fn charts_for(transactions: &[Transaction]) -> [DashboardChart; 3] {
        build_dashboard_charts(
            &monthly_totals(transactions),
            &category_breakdown(transactions),
            &category_totals(transactions),
        )
    }

    #[test]
    fn empty_data_has_no_chart_options() {
        let charts = charts_for(&[]);

        assert!(charts.iter().all(|chart| chart.options.is_none()));
        assert!(monthly_spending_chart(&[]).is_none());
    }

    #[test]
    fn monthly_chart_uses_month_labels_in_order() {
        let transactions = sample_transactions();

        let options = monthly_spending_chart(&monthly_totals(&transactions))
            .expect("want a chart for non-empty data")
            .to_string();

        let january = options.find("Jan 2024").expect("missing Jan 2024 label");
        let february = options.find("Feb 2024").expect("missing Feb 2024 label");
        assert!(january < february);
    }

    #[test]
    fn pie_chart_embeds_computed_percentages() {
        let transactions = sample_transactions();

        let options = category_pie_chart(&category_breakdown(&transactions))
            .expect("want a chart for non-empty data")
            .to_string();

        assert!(options.contains("Food"));
        assert!(options.contains("75"), "want Food's 75% share in {options}");
    }

    #[test]
    fn empty_charts_render_message_instead_of_container() {
        let charts = charts_for(&[]);

        let markup = charts_view(&charts).into_string();

        assert_eq!(markup.matches("No data to display yet").count(), 3);
        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want an inline script");
        };
        assert!(!script.0.contains("echarts.init"));
    }

    #[test]
    fn script_initialises_each_chart_with_data() {
        let charts = charts_for(&sample_transactions());

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want an inline script");
        };

        for chart in &charts {
            assert!(
                script.0.contains(chart.id),
                "script does not reference {}",
                chart.id
            );
        }
        assert_eq!(script.0.matches("echarts.init").count(), 3);
    }

    #[test]
    fn script_text_cannot_close_the_script_element() {
        let escaped = escape_script_text(r#"{"name":"</script><b>"}"#);

        assert_eq!(escaped, r#"{"name":"\u003c/script>\u003cb>"}"#);
    }

    #[test]
    fn category_markup_is_escaped_in_chart_script() {
        let transactions = vec![Transaction {
            id: 1,
            amount: 10.0,
            date: date!(2024 - 01 - 15),
            description: "Snacks".to_owned(),
            category: Some("</script><script>alert(1)</script>".to_owned()),
        }];
        let charts = charts_for(&transactions);

        let HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("want an inline script");
        };

        assert!(!script.0.contains('<'));
        assert_eq!(script.0.matches("echarts.init").count(), 3);
    }
}
