use std::fmt::Write;

use crate::models::Notification;
use crate::utils::escape_html;
use crate::view::render::{columns, FixtureRow};
use crate::view::FixtureView;

fn render_notification(out: &mut String, n: &Notification) {
    let _ = write!(
        out,
        r#"<div class="alert alert-{} alert-dismissible fade show">{}<button type="button" class="btn-close" data-bs-dismiss="alert"></button></div>"#,
        n.level.as_str(),
        escape_html(&n.message)
    );
}

fn render_status_badge(out: &mut String, row: &FixtureRow) {
    let icon = row
        .estado
        .icon()
        .map(|i| format!(r#"<i class="fas {} me-1"></i>"#, i))
        .unwrap_or_default();
    let _ = write!(
        out,
        r#"<span class="badge {}">{}{}</span>"#,
        row.estado.badge_class(),
        icon,
        row.estado.label()
    );
}

pub fn render_row_html(out: &mut String, row: &FixtureRow) {
    out.push_str(r#"<tr class="partido-row""#);
    for (name, value) in row.attrs.data_attributes() {
        let _ = write!(out, r#" {}="{}""#, name, escape_html(value));
    }
    if !row.visible {
        out.push_str(r#" style="display: none""#);
    }
    out.push('>');

    let _ = write!(
        out,
        r#"<td><div class="d-flex flex-column"><strong>{}</strong><small class="text-muted">{}</small></div></td>"#,
        row.fecha, row.hora
    );
    let _ = write!(
        out,
        r#"<td><span class="badge bg-primary">{}</span></td>"#,
        escape_html(&row.cells[columns::FASE])
    );
    let _ = write!(
        out,
        r#"<td><strong>{}</strong></td>"#,
        escape_html(&row.cells[columns::LOCAL])
    );
    match row.score {
        Some((local, visitante)) => {
            let _ = write!(
                out,
                r#"<td><span class="badge bg-success fs-6">{}</span><span class="mx-2 text-muted">-</span><span class="badge bg-success fs-6">{}</span></td>"#,
                local, visitante
            );
        }
        None => out.push_str(r#"<td><span class="text-muted">vs</span></td>"#),
    }
    let _ = write!(
        out,
        r#"<td><strong>{}</strong></td>"#,
        escape_html(&row.cells[columns::VISITANTE])
    );
    out.push_str("<td>");
    render_status_badge(out, row);
    out.push_str("</td>");
    let _ = write!(
        out,
        r#"<td><a class="btn btn-sm btn-outline-primary" href="/partidos/{}/detalle"><i class="fas fa-eye"></i></a></td>"#,
        escape_html(&row.detail.partido_id)
    );
    out.push_str("</tr>");
}

/// The whole fixture page: alerts, then the `#partidosTable` table.
pub fn render_page(view: &FixtureView) -> String {
    let mut out = String::from(
        r#"<!DOCTYPE html><html lang="es"><head><meta charset="utf-8"><title>Fixture</title></head><body><div class="container">"#,
    );

    for n in view.notifications().active() {
        render_notification(&mut out, &n);
    }

    out.push_str(r#"<table class="table" id="partidosTable"><thead><tr>"#);
    for (i, header) in view.table().headers().iter().enumerate() {
        let mut class = String::new();
        if header.sortable {
            class.push_str("sortable");
            if let Some(dir) = header.sort {
                class.push(' ');
                class.push_str(dir.css_class());
            }
        }
        let _ = write!(
            out,
            r#"<th class="{}" data-column="{}">{}</th>"#,
            class,
            i,
            escape_html(&header.label)
        );
    }
    out.push_str("</tr></thead><tbody>");

    for row in view.table().rows() {
        render_row_html(&mut out, row);
    }

    out.push_str("</tbody></table></div></body></html>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::filter::FilterSnapshot;
    use crate::view::render::render_row;
    use crate::view::test_support::partido;

    #[test]
    fn test_row_carries_data_attributes() {
        let mut out = String::new();
        render_row_html(&mut out, &render_row(&partido("7", "grupos", "en_curso", "Norte", "Sur")));
        assert!(out.contains(r#"data-fase="grupos""#));
        assert!(out.contains(r#"data-estado="en_curso""#));
        assert!(out.contains(r#"data-equipo-local="Norte""#));
        assert!(out.contains(r#"data-equipo-visitante="Sur""#));
        assert!(out.contains("En Curso"));
        assert!(out.contains("/partidos/7/detalle"));
    }

    #[test]
    fn test_server_strings_are_escaped() {
        let mut out = String::new();
        render_row_html(
            &mut out,
            &render_row(&partido("1", "grupos", "programado", "<script>", "B\"C")),
        );
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;"));
        assert!(out.contains(r#"data-equipo-visitante="B&quot;C""#));
    }

    #[test]
    fn test_page_hides_filtered_rows() {
        let mut view = FixtureView::new();
        view.accept(
            1,
            &[
                partido("1", "grupos", "programado", "A", "B"),
                partido("2", "final", "programado", "C", "D"),
            ],
        );
        view.set_filter(FilterSnapshot::new("final", "", ""));

        let page = render_page(&view);
        assert!(page.contains(r#"id="partidosTable""#));
        assert_eq!(page.matches(r#"style="display: none""#).count(), 1);
    }
}
