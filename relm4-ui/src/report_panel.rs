use std::path::PathBuf;
use std::sync::Arc;

use core_types::{OperationStatus, ReportFormat};
use relm4::{
    Component, ComponentController, ComponentParts, ComponentSender, Controller, RelmWidgetExt,
    gtk::{
        self, FileChooserDialog,
        gio::prelude::FileExt,
        glib::clone,
        prelude::{
            BoxExt, ButtonExt, DialogExt, FileChooserExt, GtkWindowExt, OrientableExt, WidgetExt,
        },
    },
    typed_view::list::{RelmListItem, TypedListView},
};
use reports_api::{ApiError, ops::SchoolReportsApi};
use service::{
    error::Error,
    filter_cascade::{CascadeChange, FetchStatus, FetchToken, FilterCascade},
    report_service::ReportService,
};
use strum::IntoEnumIterator;
use ui_components::{OptionDropDown, OptionDropDownInit, OptionDropDownMsg, OptionDropDownOutputMsg};

use crate::utils::dialog_utils::{show_error_dialog, show_info_dialog};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartmentListItem {
    pub name: String,
}

pub struct DepartmentItemWidgets {
    label: gtk::Label,
}

impl RelmListItem for DepartmentListItem {
    type Root = gtk::Box;
    type Widgets = DepartmentItemWidgets;

    fn setup(_item: &gtk::ListItem) -> (gtk::Box, DepartmentItemWidgets) {
        relm4::view! {
            my_box = gtk::Box {
                set_orientation: gtk::Orientation::Horizontal,
                #[name = "label"]
                gtk::Label,
            }
        }

        let widgets = DepartmentItemWidgets { label };

        (my_box, widgets)
    }

    fn bind(&mut self, widgets: &mut Self::Widgets, _root: &mut Self::Root) {
        let DepartmentItemWidgets { label } = widgets;
        label.set_label(self.name.as_str());
    }
}

#[derive(Debug)]
pub enum ReportPanelMsg {
    Initialize,
    SchoolSelected(Option<String>),
    AcademicYearSelected(Option<String>),
    SemesterSelected(Option<String>),
    FormatChanged(u32),
    GenerateFullReport,
    GenerateNegativeCommentsReport,
    FullReportFolderSelected(PathBuf),
    NegativeCommentsFolderSelected(PathBuf),
}

#[derive(Debug)]
pub enum CommandMsg {
    SchoolsFetched {
        token: FetchToken,
        result: Result<Vec<String>, ApiError>,
    },
    AcademicYearsFetched {
        token: FetchToken,
        result: Result<Vec<String>, ApiError>,
    },
    SemestersFetched {
        token: FetchToken,
        result: Result<Vec<String>, ApiError>,
    },
    DepartmentsFetched {
        token: FetchToken,
        result: Result<Vec<String>, ApiError>,
    },
    FullReportFinished(Result<PathBuf, Error>),
    NegativeCommentsFinished(Result<PathBuf, Error>),
}

pub struct ReportPanelInit {
    pub api: Arc<dyn SchoolReportsApi>,
}

pub struct ReportPanelModel {
    api: Arc<dyn SchoolReportsApi>,
    report_service: ReportService,
    cascade: FilterCascade,
    report_format: ReportFormat,
    formats: Vec<ReportFormat>,
    full_report_status: OperationStatus,
    negative_comments_status: OperationStatus,
    school_dropdown: Controller<OptionDropDown>,
    academic_year_dropdown: Controller<OptionDropDown>,
    semester_dropdown: Controller<OptionDropDown>,
    format_dropdown: gtk::DropDown,
    departments_list_view_wrapper: TypedListView<DepartmentListItem, gtk::NoSelection>,
}

#[relm4::component(pub)]
impl Component for ReportPanelModel {
    type Input = ReportPanelMsg;
    type Output = ();
    type CommandOutput = CommandMsg;
    type Init = ReportPanelInit;

    view! {
        #[root]
        gtk::Window {
            set_title: Some("School Feedback Reports"),
            set_default_width: 640,
            set_default_height: 760,

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_margin_all: 10,
                set_spacing: 10,

                gtk::Label {
                    set_label: "School-wise Report Generation",
                },

                gtk::Label {
                    set_label: "Generate feedback analysis reports covering every department \
                        of a school, in Excel or PDF format.",
                    set_wrap: true,
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 6,

                    gtk::Label {
                        set_label: "School *",
                    },
                    #[local_ref]
                    school_dropdown_box -> gtk::Box {},
                    gtk::Label {
                        set_label: "Loading schools...",
                        #[watch]
                        set_visible: model.cascade.schools().is_loading(),
                    },
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 6,

                    gtk::Label {
                        set_label: "Current Academic Year *",
                    },
                    #[local_ref]
                    academic_year_dropdown_box -> gtk::Box {},
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 6,
                    #[watch]
                    set_sensitive: !model.cascade.filters().current_ay.is_empty(),

                    gtk::Label {
                        set_label: "Semester *",
                    },
                    #[local_ref]
                    semester_dropdown_box -> gtk::Box {},
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 6,
                    #[watch]
                    set_visible: !model.cascade.filters().school.is_empty(),

                    gtk::Label {
                        #[watch]
                        set_label: &format!("Departments in {}", model.cascade.filters().school),
                    },
                    gtk::Label {
                        set_label: "Loading departments...",
                        #[watch]
                        set_visible: model.cascade.departments().is_loading(),
                    },
                    gtk::Label {
                        set_label: "No departments found",
                        #[watch]
                        set_visible: model.cascade.departments().status() == FetchStatus::Ready
                            && model.cascade.departments().values().is_empty(),
                    },
                    gtk::ScrolledWindow {
                        set_min_content_height: 120,
                        #[local_ref]
                        departments_list -> gtk::ListView {},
                    },
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 6,

                    gtk::Label {
                        set_label: "Report Format",
                    },
                    #[local_ref]
                    format_dropdown -> gtk::DropDown {},
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 6,

                    gtk::Button {
                        #[watch]
                        set_label: if model.full_report_status.is_in_flight() {
                            "Generating Report..."
                        } else {
                            "Generate School Report"
                        },
                        #[watch]
                        set_sensitive: model.cascade.filters().is_complete()
                            && !model.full_report_status.is_in_flight(),
                        connect_clicked => ReportPanelMsg::GenerateFullReport,
                    },
                    gtk::Button {
                        #[watch]
                        set_label: if model.negative_comments_status.is_in_flight() {
                            "Generating..."
                        } else {
                            "Generate Negative Comments Excel"
                        },
                        #[watch]
                        set_sensitive: model.cascade.filters().is_complete()
                            && !model.negative_comments_status.is_in_flight(),
                        connect_clicked => ReportPanelMsg::GenerateNegativeCommentsReport,
                    },
                },
            }
        }
    }

    fn init(
        init_model: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let school_dropdown = Self::create_option_dropdown(
            "Select School",
            &sender,
            ReportPanelMsg::SchoolSelected,
        );
        let academic_year_dropdown = Self::create_option_dropdown(
            "Select Academic Year",
            &sender,
            ReportPanelMsg::AcademicYearSelected,
        );
        let semester_dropdown = Self::create_option_dropdown(
            "Select Semester",
            &sender,
            ReportPanelMsg::SemesterSelected,
        );
        let (format_dropdown, formats) = Self::create_format_dropdown(&sender);

        let departments_list_view_wrapper =
            TypedListView::<DepartmentListItem, gtk::NoSelection>::new();

        let model = ReportPanelModel {
            report_service: ReportService::new(Arc::clone(&init_model.api)),
            api: init_model.api,
            cascade: FilterCascade::new(),
            report_format: ReportFormat::default(),
            formats,
            full_report_status: OperationStatus::default(),
            negative_comments_status: OperationStatus::default(),
            school_dropdown,
            academic_year_dropdown,
            semester_dropdown,
            format_dropdown,
            departments_list_view_wrapper,
        };

        let school_dropdown_box = model.school_dropdown.widget();
        let academic_year_dropdown_box = model.academic_year_dropdown.widget();
        let semester_dropdown_box = model.semester_dropdown.widget();
        let format_dropdown = &model.format_dropdown;
        let departments_list = &model.departments_list_view_wrapper.view;
        let widgets = view_output!();

        sender.input(ReportPanelMsg::Initialize);
        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>, root: &Self::Root) {
        match msg {
            ReportPanelMsg::Initialize => {
                tracing::info!("Fetching schools and academic years...");
                let (schools_token, ay_token) = self.cascade.initialize();
                let api = Arc::clone(&self.api);
                sender.oneshot_command(async move {
                    let result = api.list_schools().await;
                    CommandMsg::SchoolsFetched {
                        token: schools_token,
                        result,
                    }
                });
                let api = Arc::clone(&self.api);
                sender.oneshot_command(async move {
                    let result = api.list_current_academic_years().await;
                    CommandMsg::AcademicYearsFetched {
                        token: ay_token,
                        result,
                    }
                });
            }
            ReportPanelMsg::SchoolSelected(value) => {
                let value = value.unwrap_or_default();
                match self.cascade.set_school(&value) {
                    CascadeChange::Unchanged => (),
                    CascadeChange::Cleared => {
                        self.reset_dependent_widgets();
                    }
                    CascadeChange::Fetch(token) => {
                        self.reset_dependent_widgets();
                        let api = Arc::clone(&self.api);
                        sender.oneshot_command(async move {
                            let result = api.list_departments(&value).await;
                            CommandMsg::DepartmentsFetched { token, result }
                        });
                    }
                }
            }
            ReportPanelMsg::AcademicYearSelected(value) => {
                let value = value.unwrap_or_default();
                match self.cascade.set_current_ay(&value) {
                    CascadeChange::Unchanged => (),
                    CascadeChange::Cleared => {
                        self.semester_dropdown
                            .emit(OptionDropDownMsg::SetOptions(Vec::new()));
                    }
                    CascadeChange::Fetch(token) => {
                        self.semester_dropdown
                            .emit(OptionDropDownMsg::SetOptions(Vec::new()));
                        let api = Arc::clone(&self.api);
                        sender.oneshot_command(async move {
                            let result = api.list_semesters(&value).await;
                            CommandMsg::SemestersFetched { token, result }
                        });
                    }
                }
            }
            ReportPanelMsg::SemesterSelected(value) => {
                self.cascade.set_semester(&value.unwrap_or_default());
            }
            ReportPanelMsg::FormatChanged(index) => {
                self.report_format = self
                    .formats
                    .get(index as usize)
                    .copied()
                    .unwrap_or_default();
                tracing::info!("Report format changed to {:?}", self.report_format);
            }
            ReportPanelMsg::GenerateFullReport => {
                self.open_folder_dialog(root, &sender, ReportPanelMsg::FullReportFolderSelected);
            }
            ReportPanelMsg::GenerateNegativeCommentsReport => {
                self.open_folder_dialog(
                    root,
                    &sender,
                    ReportPanelMsg::NegativeCommentsFolderSelected,
                );
            }
            ReportPanelMsg::FullReportFolderSelected(path) => {
                self.full_report_status = OperationStatus::InFlight;
                let report_service = self.report_service.clone();
                let filters = self.cascade.snapshot();
                let format = self.report_format;
                sender.oneshot_command(async move {
                    let result = report_service
                        .generate_full_report(filters, format, &path)
                        .await;
                    CommandMsg::FullReportFinished(result)
                });
            }
            ReportPanelMsg::NegativeCommentsFolderSelected(path) => {
                self.negative_comments_status = OperationStatus::InFlight;
                let report_service = self.report_service.clone();
                let filters = self.cascade.snapshot();
                sender.oneshot_command(async move {
                    let result = report_service
                        .generate_negative_comments_report(filters, &path)
                        .await;
                    CommandMsg::NegativeCommentsFinished(result)
                });
            }
        }
    }

    fn update_cmd(
        &mut self,
        message: Self::CommandOutput,
        _sender: ComponentSender<Self>,
        root: &Self::Root,
    ) {
        match message {
            CommandMsg::SchoolsFetched { token, result } => {
                let error_message = result.as_ref().err().map(|e| e.to_string());
                if self.cascade.apply_schools(token, result) {
                    match error_message {
                        Some(message) => show_error_dialog(
                            format!("Error fetching schools: {}", message),
                            root,
                        ),
                        None => self.school_dropdown.emit(OptionDropDownMsg::SetOptions(
                            self.cascade.schools().values().to_vec(),
                        )),
                    }
                }
            }
            CommandMsg::AcademicYearsFetched { token, result } => {
                let error_message = result.as_ref().err().map(|e| e.to_string());
                if self.cascade.apply_academic_years(token, result) {
                    match error_message {
                        Some(message) => show_error_dialog(
                            format!("Error fetching academic years: {}", message),
                            root,
                        ),
                        None => self
                            .academic_year_dropdown
                            .emit(OptionDropDownMsg::SetOptions(
                                self.cascade.academic_years().values().to_vec(),
                            )),
                    }
                }
            }
            CommandMsg::SemestersFetched { token, result } => {
                let error_message = result.as_ref().err().map(|e| e.to_string());
                if self.cascade.apply_semesters(token, result) {
                    match error_message {
                        Some(message) => show_error_dialog(
                            format!("Error fetching semesters: {}", message),
                            root,
                        ),
                        None => self.semester_dropdown.emit(OptionDropDownMsg::SetOptions(
                            self.cascade.semesters().values().to_vec(),
                        )),
                    }
                }
            }
            CommandMsg::DepartmentsFetched { token, result } => {
                let error_message = result.as_ref().err().map(|e| e.to_string());
                if self.cascade.apply_departments(token, result) {
                    match error_message {
                        Some(message) => show_error_dialog(
                            format!("Error fetching departments: {}", message),
                            root,
                        ),
                        None => self.populate_departments(),
                    }
                }
            }
            CommandMsg::FullReportFinished(result) => match result {
                Ok(path) => {
                    self.full_report_status = OperationStatus::Succeeded;
                    show_info_dialog(format!("School report saved to {}", path.display()), root);
                }
                Err(e) => {
                    self.full_report_status = OperationStatus::Failed;
                    show_error_dialog(format!("Error generating school report: {}", e), root);
                }
            },
            CommandMsg::NegativeCommentsFinished(result) => match result {
                Ok(path) => {
                    self.negative_comments_status = OperationStatus::Succeeded;
                    show_info_dialog(
                        format!("Negative comments report saved to {}", path.display()),
                        root,
                    );
                }
                Err(e) => {
                    self.negative_comments_status = OperationStatus::Failed;
                    show_error_dialog(
                        format!("Error generating negative comments report: {}", e),
                        root,
                    );
                }
            },
        }
    }
}

impl ReportPanelModel {
    fn create_option_dropdown(
        placeholder: &str,
        sender: &ComponentSender<Self>,
        to_msg: fn(Option<String>) -> ReportPanelMsg,
    ) -> Controller<OptionDropDown> {
        OptionDropDown::builder()
            .launch(OptionDropDownInit {
                placeholder: placeholder.to_string(),
            })
            .forward(sender.input_sender(), move |msg| match msg {
                OptionDropDownOutputMsg::SelectionChanged(value) => to_msg(value),
            })
    }

    fn create_format_dropdown(
        sender: &ComponentSender<Self>,
    ) -> (gtk::DropDown, Vec<ReportFormat>) {
        let formats: Vec<ReportFormat> = ReportFormat::iter().collect();
        let labels: Vec<String> = formats.iter().map(|f| f.to_string()).collect();
        let label_refs: Vec<&str> = labels.iter().map(|s| s.as_str()).collect();
        let string_list = gtk::StringList::new(&label_refs);

        let dropdown = gtk::DropDown::new(Some(string_list), None::<gtk::Expression>);
        dropdown.set_selected(0);
        dropdown.connect_selected_notify(clone!(
            #[strong]
            sender,
            move |dropdown| {
                sender.input(ReportPanelMsg::FormatChanged(dropdown.selected()));
            }
        ));
        (dropdown, formats)
    }

    fn open_folder_dialog(
        &self,
        root: &gtk::Window,
        sender: &ComponentSender<Self>,
        to_msg: fn(PathBuf) -> ReportPanelMsg,
    ) {
        let dialog = FileChooserDialog::builder()
            .title("Select folder to save the report")
            .action(gtk::FileChooserAction::SelectFolder)
            .modal(true)
            .transient_for(root)
            .build();

        dialog.add_button("Cancel", gtk::ResponseType::Cancel);
        dialog.add_button("Select", gtk::ResponseType::Accept);

        dialog.connect_response(clone!(
            #[strong]
            sender,
            move |dialog, response| {
                if response == gtk::ResponseType::Accept
                    && let Some(path) = dialog.file().and_then(|f| f.path())
                {
                    sender.input(to_msg(path));
                }
                dialog.close();
            }
        ));

        dialog.present();
    }

    fn reset_dependent_widgets(&mut self) {
        self.academic_year_dropdown
            .emit(OptionDropDownMsg::ClearSelection);
        self.semester_dropdown
            .emit(OptionDropDownMsg::SetOptions(Vec::new()));
        self.departments_list_view_wrapper.clear();
    }

    fn populate_departments(&mut self) {
        let items = self
            .cascade
            .departments()
            .values()
            .iter()
            .map(|name| DepartmentListItem { name: name.clone() });
        self.departments_list_view_wrapper.clear();
        self.departments_list_view_wrapper.extend_from_iter(items);
    }
}
